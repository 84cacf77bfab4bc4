use crate::domain::{Loan, Member, MemberId, commands::RegisterMember};

use super::dependencies::ServiceDependencies;
use super::errors::{LibraryError, Operation, OperationContext, Result};

/// 会員を登録する
///
/// ビジネスルール：
/// - IDと名前は空白不可
/// - IDは大文字小文字を区別せず一意
pub async fn register_member(deps: &ServiceDependencies, cmd: RegisterMember) -> Result<Member> {
    let result = try_register_member(deps, &cmd).await;
    match &result {
        Ok(member) => tracing::info!(member_id = %member.id(), "Member registered: {}", member),
        Err(e) => tracing::warn!(member_id = %cmd.id, "Member rejected: {}", e),
    }
    result.during(Operation::RegisterMember)
}

async fn try_register_member(
    deps: &ServiceDependencies,
    cmd: &RegisterMember,
) -> std::result::Result<Member, LibraryError> {
    let member = Member::new(&cmd.id, &cmd.name)?;

    if deps.member_directory.exists_by_id(member.id()).await? {
        return Err(LibraryError::Conflict(format!(
            "A member with ID '{}' already exists",
            member.id()
        )));
    }

    deps.member_directory.add(member.clone()).await?;

    Ok(member)
}

pub async fn find_member(deps: &ServiceDependencies, member_id: &str) -> Result<Option<Member>> {
    let lookup = async {
        let id = MemberId::parse(member_id)?;
        Ok::<_, LibraryError>(deps.member_directory.find(&id).await?)
    };
    lookup.await.during(Operation::Query("member"))
}

pub async fn member_exists(deps: &ServiceDependencies, member_id: &str) -> Result<bool> {
    let lookup = async {
        let id = MemberId::parse(member_id)?;
        Ok::<_, LibraryError>(deps.member_directory.exists_by_id(&id).await?)
    };
    lookup.await.during(Operation::Query("member"))
}

pub async fn all_members(deps: &ServiceDependencies) -> Result<Vec<Member>> {
    deps.member_directory
        .all()
        .await
        .during(Operation::Query("members"))
}

/// 会員の有効な貸出を時系列順に取得する
///
/// 会員が記録している貸出IDを、貸出ディレクトリの行と突き合わせる。
pub async fn active_loans_for_member(
    deps: &ServiceDependencies,
    member_id: &str,
) -> Result<Vec<Loan>> {
    let lookup = async {
        let id = MemberId::parse(member_id)?;
        let member = deps
            .member_directory
            .find(&id)
            .await?
            .ok_or_else(|| LibraryError::NotFound(format!("Member '{}' not found", id)))?;
        let loans = deps.loan_directory.by_member(member.id()).await?;
        Ok::<_, LibraryError>(member.active_loans(&loans))
    };
    lookup.await.during(Operation::Query("member loans"))
}

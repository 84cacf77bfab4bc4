use crate::domain::{Member, MemberId};
use crate::ports::{
    DirectoryError,
    error::Result,
    member_directory::MemberDirectory as MemberDirectoryTrait,
};
use async_trait::async_trait;
use std::sync::Mutex;

use super::lock;

/// In-memory implementation of MemberDirectory
///
/// Keeps members in registration order.
/// Lookups ignore case; member equality itself does not.
pub struct MemberDirectory {
    members: Mutex<Vec<Member>>,
}

impl MemberDirectory {
    pub fn new() -> Self {
        Self {
            members: Mutex::new(Vec::new()),
        }
    }
}

impl Default for MemberDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MemberDirectoryTrait for MemberDirectory {
    async fn find(&self, id: &MemberId) -> Result<Option<Member>> {
        let key = id.key();
        let members = lock(&self.members, "member directory")?;
        Ok(members.iter().find(|m| m.id().key() == key).cloned())
    }

    async fn exists_by_id(&self, id: &MemberId) -> Result<bool> {
        let key = id.key();
        let members = lock(&self.members, "member directory")?;
        Ok(members.iter().any(|m| m.id().key() == key))
    }

    async fn add(&self, member: Member) -> Result<()> {
        let mut members = lock(&self.members, "member directory")?;
        let key = member.id().key();
        if members.iter().any(|m| m.id().key() == key) {
            return Err(DirectoryError::Conflict(format!(
                "A member with ID '{}' already exists",
                member.id()
            )));
        }
        members.push(member);
        Ok(())
    }

    async fn update(&self, member: Member) -> Result<()> {
        let key = member.id().key();
        let mut members = lock(&self.members, "member directory")?;
        match members.iter_mut().find(|m| m.id().key() == key) {
            Some(slot) => {
                *slot = member;
                Ok(())
            }
            None => Err(DirectoryError::NotFound(format!(
                "Member '{}' not found",
                member.id()
            ))),
        }
    }

    async fn all(&self) -> Result<Vec<Member>> {
        Ok(lock(&self.members, "member directory")?.clone())
    }
}

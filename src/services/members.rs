//! Member registry service

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{Member, MemberInput},
    repository::CatalogStore,
};

#[derive(Clone)]
pub struct MembersService {
    store: Arc<dyn CatalogStore>,
}

impl MembersService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    pub async fn list_members(&self) -> AppResult<Vec<Member>> {
        let mut uow = self.store.begin().await?;
        uow.list_members().await
    }

    pub async fn get_member(&self, id: i32) -> AppResult<Member> {
        let mut uow = self.store.begin().await?;
        uow.get_member(id).await
    }

    /// Register a member with a zero balance
    pub async fn create_member(&self, input: MemberInput) -> AppResult<Member> {
        input.check()?;

        let mut uow = self.store.begin().await?;
        let member = uow.insert_member(&input).await?;
        uow.commit().await?;

        tracing::info!("Member added: id={}", member.id);
        Ok(member)
    }

    /// Update contact details; balances are left untouched
    pub async fn update_member(&self, id: i32, input: MemberInput) -> AppResult<Member> {
        input.check()?;

        let mut uow = self.store.begin().await?;
        if !uow.update_member_contact(id, &input).await? {
            return Err(AppError::NotFound(format!("Member with id {} not found", id)));
        }
        let member = uow.get_member(id).await?;
        uow.commit().await?;

        tracing::info!("Member updated: id={}", id);
        Ok(member)
    }

    /// Delete a member without any lending history
    pub async fn delete_member(&self, id: i32) -> AppResult<()> {
        let mut uow = self.store.begin().await?;
        uow.get_member(id).await?;

        let references = uow.count_member_transactions(id).await?;
        if references > 0 {
            return Err(AppError::State(format!(
                "Member {} is referenced by {} transaction(s)",
                id, references
            )));
        }

        uow.delete_member(id).await?;
        uow.commit().await?;

        tracing::info!("Member deleted: id={}", id);
        Ok(())
    }
}

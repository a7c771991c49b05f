//! Addresses service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    auth::UserId,
    database::Db,
    domain::addresses::{
        errors::AddressesServiceError,
        models::{Address, AddressId, AddressUpdate, NewAddress},
        repository::PgAddressesRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgAddressesService {
    db: Db,
    repository: PgAddressesRepository,
}

impl PgAddressesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgAddressesRepository::new(),
        }
    }
}

#[async_trait]
impl AddressesService for PgAddressesService {
    async fn list_addresses(&self, owner: UserId) -> Result<Vec<Address>, AddressesServiceError> {
        let mut tx = self.db.begin().await?;

        let addresses = self.repository.list_addresses(&mut tx, owner).await?;

        tx.commit().await?;

        Ok(addresses)
    }

    async fn get_address(
        &self,
        owner: UserId,
        address: AddressId,
    ) -> Result<Address, AddressesServiceError> {
        let mut tx = self.db.begin().await?;

        let address = self
            .repository
            .get_address(&mut tx, address, owner)
            .await?
            .ok_or(AddressesServiceError::NotFound)?;

        tx.commit().await?;

        Ok(address)
    }

    async fn create_address(
        &self,
        owner: UserId,
        address: NewAddress,
    ) -> Result<Address, AddressesServiceError> {
        validate_new_address(&address)?;

        let mut tx = self.db.begin().await?;

        if address.is_default {
            self.repository.clear_default_address(&mut tx, owner).await?;
        }

        let created = self.repository.create_address(&mut tx, owner, address).await?;

        tx.commit().await?;

        info!(user_id = %owner, address_id = %created.id, "address created");

        Ok(created)
    }

    async fn update_address(
        &self,
        owner: UserId,
        address: AddressId,
        update: AddressUpdate,
    ) -> Result<Address, AddressesServiceError> {
        validate_address_update(&update)?;

        let mut tx = self.db.begin().await?;

        // Rolled back with the rest of the transaction when the address is not the owner's.
        if update.is_default == Some(true) {
            self.repository.clear_default_address(&mut tx, owner).await?;
        }

        let updated = self
            .repository
            .update_address(&mut tx, address, owner, update)
            .await?
            .ok_or(AddressesServiceError::NotFound)?;

        tx.commit().await?;

        info!(user_id = %owner, address_id = %updated.id, "address updated");

        Ok(updated)
    }

    async fn delete_address(
        &self,
        owner: UserId,
        address: AddressId,
    ) -> Result<(), AddressesServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.delete_address(&mut tx, address, owner).await?;

        if rows_affected == 0 {
            return Err(AddressesServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait AddressesService: Send + Sync {
    /// List a user's addresses, default first.
    async fn list_addresses(&self, owner: UserId) -> Result<Vec<Address>, AddressesServiceError>;

    /// Fetch an address owned by `owner`; addresses of other users are `NotFound`.
    async fn get_address(
        &self,
        owner: UserId,
        address: AddressId,
    ) -> Result<Address, AddressesServiceError>;

    /// Add an address. A new default replaces the previous one.
    async fn create_address(
        &self,
        owner: UserId,
        address: NewAddress,
    ) -> Result<Address, AddressesServiceError>;

    /// Change the supplied fields of an address owned by `owner`. Becoming
    /// the default clears the previous default.
    async fn update_address(
        &self,
        owner: UserId,
        address: AddressId,
        update: AddressUpdate,
    ) -> Result<Address, AddressesServiceError>;

    /// Delete an address owned by `owner`.
    async fn delete_address(
        &self,
        owner: UserId,
        address: AddressId,
    ) -> Result<(), AddressesServiceError>;
}

fn validate_pincode(pincode: &str) -> Result<(), AddressesServiceError> {
    if pincode.len() != 6 || !pincode.chars().all(|c| c.is_ascii_digit()) {
        return Err(AddressesServiceError::InvalidData(
            "Pincode must be exactly 6 digits",
        ));
    }

    Ok(())
}

fn validate_new_address(address: &NewAddress) -> Result<(), AddressesServiceError> {
    validate_pincode(&address.pincode)?;

    let required = [
        &address.name,
        &address.address,
        &address.city,
        &address.state,
    ];

    if required.iter().any(|value| value.trim().is_empty()) {
        return Err(AddressesServiceError::InvalidData(
            "name, address, city and state are required",
        ));
    }

    Ok(())
}

fn validate_address_update(update: &AddressUpdate) -> Result<(), AddressesServiceError> {
    if let Some(pincode) = &update.pincode {
        validate_pincode(pincode)?;
    }

    let supplied = [
        &update.name,
        &update.address,
        &update.city,
        &update.state,
        &update.country,
    ];

    if supplied
        .iter()
        .any(|value| value.as_deref().is_some_and(|value| value.trim().is_empty()))
    {
        return Err(AddressesServiceError::InvalidData(
            "name, address, city, state and country cannot be blank",
        ));
    }

    Ok(())
}

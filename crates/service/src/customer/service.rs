use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use storage::BlobStore;

use super::domain::{Customer, CustomerPatch, NewCustomer, RegistrationRequest, UpdateCustomerRequest};
use super::errors::CustomerError;
use super::merge::{merge, Field};
use super::repository::CustomerRepository;
use crate::hash::CredentialHasher;

/// Customer business service independent of web framework.
pub struct CustomerService<R: CustomerRepository> {
    repo: Arc<R>,
    hasher: Arc<dyn CredentialHasher>,
    blobs: Arc<dyn BlobStore>,
    bucket: String,
}

fn profile_image_key(customer_id: i32, profile_image_id: &str) -> String {
    format!("profile-images/{customer_id}/{profile_image_id}")
}

impl<R: CustomerRepository> CustomerService<R> {
    pub fn new(
        repo: Arc<R>,
        hasher: Arc<dyn CredentialHasher>,
        blobs: Arc<dyn BlobStore>,
        bucket: impl Into<String>,
    ) -> Self {
        Self { repo, hasher, blobs, bucket: bucket.into() }
    }

    pub async fn get_all_customers(&self) -> Result<Vec<Customer>, CustomerError> {
        self.repo.find_all().await
    }

    pub async fn get_customer_by_id(&self, id: i32) -> Result<Customer, CustomerError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| CustomerError::not_found_id(id))
    }

    pub async fn get_customer_by_email(&self, email: &str) -> Result<Customer, CustomerError> {
        self.repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| CustomerError::not_found_email(email))
    }

    /// Register a new customer with a hashed credential.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::customer::CustomerService;
    /// use service::customer::domain::{Gender, RegistrationRequest};
    /// use service::customer::repository::mock::MockCustomerRepository;
    /// use service::hash::Argon2Hasher;
    /// use storage::MemoryBackend;
    /// let repo = Arc::new(MockCustomerRepository::new());
    /// let svc = CustomerService::new(repo, Arc::new(Argon2Hasher), Arc::new(MemoryBackend::new()), "customer-bucket");
    /// let req = RegistrationRequest { name: "Luna".into(), email: "luna@dev.com".into(), password: "Secret123".into(), age: 23, gender: Gender::Female };
    /// let customer = tokio_test::block_on(svc.register(req)).unwrap();
    /// assert_eq!(customer.email, "luna@dev.com");
    /// ```
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: RegistrationRequest) -> Result<Customer, CustomerError> {
        if request.name.trim().is_empty() {
            return Err(CustomerError::Validation("name required".into()));
        }
        if !request.email.contains('@') {
            return Err(CustomerError::Validation("invalid email".into()));
        }
        if request.password.len() < 8 {
            return Err(CustomerError::Validation("password too short (>=8)".into()));
        }
        if self.repo.exists_by_email(&request.email).await? {
            debug!("email already registered: {}", request.email);
            return Err(CustomerError::DuplicateEmail(request.email));
        }

        let password_hash = self.hasher.hash(&request.password)?;
        let created = self
            .repo
            .insert(NewCustomer {
                name: request.name,
                email: request.email,
                password_hash,
                age: request.age,
                gender: request.gender,
            })
            .await?;
        info!(customer_id = created.id, email = %created.email, "customer_registered");
        Ok(created)
    }

    /// Verify a raw credential against the stored hash.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Customer, CustomerError> {
        let customer = self
            .repo
            .find_by_email(email)
            .await?
            .ok_or(CustomerError::Unauthorized)?;
        if !self.hasher.verify(password, &customer.password_hash) {
            return Err(CustomerError::Unauthorized);
        }
        Ok(customer)
    }

    /// Apply a sparse update to an existing customer.
    ///
    /// Only fields that actually differ are staged and written; a patch that
    /// produces zero effective changes is rejected with `NoChanges` so no-op
    /// update calls surface client bugs instead of silently succeeding.
    #[instrument(skip(self, request), fields(customer_id = customer_id))]
    pub async fn update_customer(
        &self,
        customer_id: i32,
        request: UpdateCustomerRequest,
    ) -> Result<Customer, CustomerError> {
        let current = self
            .repo
            .find_by_id(customer_id)
            .await?
            .ok_or_else(|| CustomerError::not_found_id(customer_id))?;

        // The credential is hashed upstream of the merge; the merge engine
        // only compares values.
        let password_hash = match &request.password {
            Some(password) => Some(self.hasher.hash(password)?),
            None => None,
        };
        let patch = CustomerPatch {
            name: request.name,
            email: request.email,
            age: request.age,
            gender: request.gender,
            password_hash,
        };

        let (merged, changes) = merge(&current, &patch);

        if changes.contains(Field::Email) && self.repo.exists_by_email(&merged.email).await? {
            return Err(CustomerError::DuplicateEmail(merged.email));
        }
        if changes.is_empty() {
            return Err(CustomerError::NoChanges);
        }

        self.repo.update_fields(customer_id, &merged, &changes).await?;
        info!(customer_id, changed = ?changes.names(), "customer_updated");
        Ok(merged)
    }

    #[instrument(skip(self), fields(customer_id = customer_id))]
    pub async fn delete_customer_by_id(&self, customer_id: i32) -> Result<(), CustomerError> {
        if !self.repo.exists_by_id(customer_id).await? {
            return Err(CustomerError::not_found_id(customer_id));
        }
        self.repo.delete(customer_id).await?;
        info!(customer_id, "customer_deleted");
        Ok(())
    }

    /// Store a profile image and point the customer record at it.
    ///
    /// The blob write happens first; if it fails the record is left
    /// untouched. A replaced image's previous blob is not deleted; the
    /// record always references the latest upload only.
    #[instrument(skip(self, data), fields(customer_id = customer_id, len = data.len()))]
    pub async fn upload_profile_image(
        &self,
        customer_id: i32,
        data: Bytes,
    ) -> Result<String, CustomerError> {
        if !self.repo.exists_by_id(customer_id).await? {
            return Err(CustomerError::not_found_id(customer_id));
        }

        let profile_image_id = Uuid::new_v4().to_string();
        let key = profile_image_key(customer_id, &profile_image_id);
        self.blobs
            .put(&self.bucket, &key, data)
            .await
            .map_err(CustomerError::Upload)?;

        self.repo.update_profile_image_id(customer_id, &profile_image_id).await?;
        info!(customer_id, %profile_image_id, "profile_image_uploaded");
        Ok(profile_image_id)
    }

    #[instrument(skip(self), fields(customer_id = customer_id))]
    pub async fn get_profile_image(&self, customer_id: i32) -> Result<Bytes, CustomerError> {
        let customer = self
            .repo
            .find_by_id(customer_id)
            .await?
            .ok_or_else(|| CustomerError::not_found_id(customer_id))?;

        let profile_image_id = customer
            .profile_image_id()
            .ok_or(CustomerError::NoImage(customer_id))?;

        let key = profile_image_key(customer_id, profile_image_id);
        self.blobs
            .get(&self.bucket, &key)
            .await
            .map_err(CustomerError::Upload)
    }
}

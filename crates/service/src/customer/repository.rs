use async_trait::async_trait;

use super::domain::{Customer, NewCustomer};
use super::errors::CustomerError;
use super::merge::ChangeSet;

/// Repository abstraction for customer persistence.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Customer>, CustomerError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Customer>, CustomerError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, CustomerError>;
    async fn exists_by_email(&self, email: &str) -> Result<bool, CustomerError>;
    async fn exists_by_id(&self, id: i32) -> Result<bool, CustomerError>;

    /// Insert a new customer; the store assigns and returns the identity.
    /// A store-level unique conflict on email surfaces as `DuplicateEmail`.
    async fn insert(&self, customer: NewCustomer) -> Result<Customer, CustomerError>;

    /// Persist the merged record, writing only the changed fields, in one
    /// logical write.
    async fn update_fields(
        &self,
        id: i32,
        merged: &Customer,
        changes: &ChangeSet,
    ) -> Result<(), CustomerError>;

    async fn update_profile_image_id(
        &self,
        id: i32,
        profile_image_id: &str,
    ) -> Result<(), CustomerError>;

    async fn delete(&self, id: i32) -> Result<(), CustomerError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockCustomerRepository {
        customers: Mutex<HashMap<i32, Customer>>, // key: id
        next_id: AtomicI32,
        writes: AtomicUsize,
    }

    impl MockCustomerRepository {
        pub fn new() -> Self {
            Self { next_id: AtomicI32::new(1), ..Self::default() }
        }

        /// Seed a record with a fixed id, as if previously inserted.
        pub fn with_customer(self, customer: Customer) -> Self {
            {
                let mut customers = self.customers.lock().unwrap();
                self.next_id.fetch_max(customer.id + 1, Ordering::SeqCst);
                customers.insert(customer.id, customer);
            }
            self
        }

        /// Number of mutating store calls observed (insert/update/delete).
        pub fn write_count(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }

        pub fn len(&self) -> usize {
            self.customers.lock().unwrap().len()
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }
    }

    #[async_trait]
    impl CustomerRepository for MockCustomerRepository {
        async fn find_all(&self) -> Result<Vec<Customer>, CustomerError> {
            let customers = self.customers.lock().unwrap();
            let mut all: Vec<Customer> = customers.values().cloned().collect();
            all.sort_by_key(|c| c.id);
            Ok(all)
        }

        async fn find_by_id(&self, id: i32) -> Result<Option<Customer>, CustomerError> {
            let customers = self.customers.lock().unwrap();
            Ok(customers.get(&id).cloned())
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, CustomerError> {
            let customers = self.customers.lock().unwrap();
            Ok(customers.values().find(|c| c.email == email).cloned())
        }

        async fn exists_by_email(&self, email: &str) -> Result<bool, CustomerError> {
            let customers = self.customers.lock().unwrap();
            Ok(customers.values().any(|c| c.email == email))
        }

        async fn exists_by_id(&self, id: i32) -> Result<bool, CustomerError> {
            let customers = self.customers.lock().unwrap();
            Ok(customers.contains_key(&id))
        }

        async fn insert(&self, customer: NewCustomer) -> Result<Customer, CustomerError> {
            let mut customers = self.customers.lock().unwrap();
            // Mirrors the store-level unique index on email
            if customers.values().any(|c| c.email == customer.email) {
                return Err(CustomerError::DuplicateEmail(customer.email));
            }
            let id = self.next_id.fetch_add(1, Ordering::SeqCst);
            let stored = Customer {
                id,
                name: customer.name,
                email: customer.email,
                password_hash: customer.password_hash,
                age: customer.age,
                gender: customer.gender,
                profile_image_id: None,
            };
            customers.insert(id, stored.clone());
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(stored)
        }

        async fn update_fields(
            &self,
            id: i32,
            merged: &Customer,
            _changes: &ChangeSet,
        ) -> Result<(), CustomerError> {
            let mut customers = self.customers.lock().unwrap();
            if merged.email != customers.get(&id).map(|c| c.email.clone()).unwrap_or_default()
                && customers.values().any(|c| c.id != id && c.email == merged.email)
            {
                return Err(CustomerError::DuplicateEmail(merged.email.clone()));
            }
            match customers.get_mut(&id) {
                Some(existing) => {
                    *existing = merged.clone();
                    self.writes.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
                None => Err(CustomerError::not_found_id(id)),
            }
        }

        async fn update_profile_image_id(
            &self,
            id: i32,
            profile_image_id: &str,
        ) -> Result<(), CustomerError> {
            let mut customers = self.customers.lock().unwrap();
            match customers.get_mut(&id) {
                Some(existing) => {
                    existing.profile_image_id = Some(profile_image_id.to_string());
                    self.writes.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
                None => Err(CustomerError::not_found_id(id)),
            }
        }

        async fn delete(&self, id: i32) -> Result<(), CustomerError> {
            let mut customers = self.customers.lock().unwrap();
            customers.remove(&id);
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }
}

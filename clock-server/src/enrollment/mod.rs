//! Enrollment Registry
//!
//! Keeps the sensor's template ids and the employee table in agreement:
//! one enrollment belongs to at most one employee and an employee holds at
//! most one enrollment. The registry never talks to the device itself.

use std::collections::{BTreeSet, HashSet};

use shared::models::{Employee, EnrollmentId};
use sqlx::SqlitePool;
use thiserror::Error;

use crate::db::repository::{RepoError, employee};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Employee {0} not found")]
    EmployeeNotFound(i64),

    #[error("Enrollment {enrollment_id} is already linked to employee {owner}")]
    EnrollmentTaken {
        enrollment_id: EnrollmentId,
        owner: i64,
    },

    #[error("Employee {employee_id} already holds enrollment {current}")]
    AlreadyEnrolled {
        employee_id: i64,
        current: EnrollmentId,
    },

    #[error(transparent)]
    Repo(#[from] RepoError),
}

pub type RegistryResult<T> = Result<T, RegistryError>;

#[derive(Clone)]
pub struct EnrollmentRegistry {
    pool: SqlitePool,
}

impl EnrollmentRegistry {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Link `enrollment_id` to `employee_id`.
    ///
    /// Linking the pair that is already stored is a no-op success.
    pub async fn link(
        &self,
        employee_id: i64,
        enrollment_id: &EnrollmentId,
    ) -> RegistryResult<Employee> {
        let target = employee::find_by_id(&self.pool, employee_id)
            .await?
            .ok_or(RegistryError::EmployeeNotFound(employee_id))?;
        self.check_linkable(&target, enrollment_id).await?;

        match employee::set_enrollment(&self.pool, employee_id, enrollment_id).await {
            Ok(true) => {}
            Ok(false) => {
                // Lost a race: the row vanished or picked up another enrollment
                let current = employee::find_by_id(&self.pool, employee_id)
                    .await?
                    .ok_or(RegistryError::EmployeeNotFound(employee_id))?;
                self.check_linkable(&current, enrollment_id).await?;
                return Ok(current);
            }
            Err(RepoError::Duplicate(_)) => {
                let owner = employee::find_by_enrollment_id(&self.pool, enrollment_id)
                    .await?
                    .map(|e| e.id)
                    .unwrap_or_default();
                return Err(RegistryError::EnrollmentTaken {
                    enrollment_id: enrollment_id.clone(),
                    owner,
                });
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!(employee_id, enrollment_id = %enrollment_id, "Enrollment linked");
        employee::find_by_id(&self.pool, employee_id)
            .await?
            .ok_or(RegistryError::EmployeeNotFound(employee_id))
    }

    /// Reject an employee that holds a different enrollment or an enrollment
    /// owned by someone else.
    pub async fn check_linkable(
        &self,
        target: &Employee,
        enrollment_id: &EnrollmentId,
    ) -> RegistryResult<()> {
        match &target.enrollment_id {
            Some(current) if current == enrollment_id => return Ok(()),
            Some(current) => {
                return Err(RegistryError::AlreadyEnrolled {
                    employee_id: target.id,
                    current: current.clone(),
                });
            }
            None => {}
        }

        if let Some(owner) = employee::find_by_enrollment_id(&self.pool, enrollment_id).await?
            && owner.id != target.id
        {
            return Err(RegistryError::EnrollmentTaken {
                enrollment_id: enrollment_id.clone(),
                owner: owner.id,
            });
        }
        Ok(())
    }

    /// Remove the employee's enrollment reference, returning it if there was one
    pub async fn unlink(&self, employee_id: i64) -> RegistryResult<Option<EnrollmentId>> {
        let previous = employee::clear_enrollment(&self.pool, employee_id).await?;
        if let Some(id) = &previous {
            tracing::info!(employee_id, enrollment_id = %id, "Enrollment unlinked");
        }
        Ok(previous)
    }

    /// Remove the reference to `enrollment_id` from whoever holds it
    pub async fn release(&self, enrollment_id: &EnrollmentId) -> RegistryResult<Option<i64>> {
        let owner = employee::release_enrollment(&self.pool, enrollment_id).await?;
        if let Some(employee_id) = owner {
            tracing::info!(employee_id, enrollment_id = %enrollment_id, "Enrollment released");
        }
        Ok(owner)
    }

    pub async fn find_by_enrollment_id(
        &self,
        enrollment_id: &EnrollmentId,
    ) -> RegistryResult<Option<Employee>> {
        Ok(employee::find_by_enrollment_id(&self.pool, enrollment_id).await?)
    }

    /// Device ids that no employee references
    pub async fn list_orphans(
        &self,
        device_ids: &[EnrollmentId],
    ) -> RegistryResult<BTreeSet<EnrollmentId>> {
        let linked: HashSet<EnrollmentId> = employee::find_enrolled(&self.pool)
            .await?
            .into_iter()
            .filter_map(|e| e.enrollment_id)
            .collect();

        Ok(device_ids
            .iter()
            .filter(|id| !linked.contains(*id))
            .cloned()
            .collect())
    }

    /// Every stored (enrollment, employee) pair
    pub async fn list_linked(&self) -> RegistryResult<Vec<(EnrollmentId, Employee)>> {
        Ok(employee::find_enrolled(&self.pool)
            .await?
            .into_iter()
            .filter_map(|e| e.enrollment_id.clone().map(|id| (id, e)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use shared::models::EmployeeCreate;

    async fn setup() -> (SqlitePool, EnrollmentRegistry) {
        let db = DbService::open_in_memory().await.unwrap();
        let registry = EnrollmentRegistry::new(db.pool.clone());
        (db.pool, registry)
    }

    async fn hire(pool: &SqlitePool, name: &str) -> Employee {
        employee::create(
            pool,
            EmployeeCreate {
                name: name.into(),
                department: None,
                position: None,
                day_rate: 100.0,
            },
            None,
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_link_same_pair_twice_is_idempotent() {
        let (pool, registry) = setup().await;
        let alice = hire(&pool, "Alice").await;
        let fp = EnrollmentId::from("3");

        let first = registry.link(alice.id, &fp).await.unwrap();
        let second = registry.link(alice.id, &fp).await.unwrap();

        assert_eq!(first.enrollment_id, Some(fp.clone()));
        assert_eq!(second.enrollment_id, Some(fp.clone()));
        assert_eq!(registry.list_linked().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_link_taken_enrollment_conflicts() {
        let (pool, registry) = setup().await;
        let alice = hire(&pool, "Alice").await;
        let bob = hire(&pool, "Bob").await;
        let fp = EnrollmentId::from("3");

        registry.link(alice.id, &fp).await.unwrap();
        let err = registry.link(bob.id, &fp).await.unwrap_err();

        assert!(matches!(
            err,
            RegistryError::EnrollmentTaken { owner, .. } if owner == alice.id
        ));
        let bob = employee::find_by_id(&pool, bob.id).await.unwrap().unwrap();
        assert!(bob.enrollment_id.is_none());
    }

    #[tokio::test]
    async fn test_link_second_enrollment_to_same_employee_conflicts() {
        let (pool, registry) = setup().await;
        let alice = hire(&pool, "Alice").await;

        registry.link(alice.id, &"1".into()).await.unwrap();
        let err = registry.link(alice.id, &"2".into()).await.unwrap_err();
        assert!(matches!(err, RegistryError::AlreadyEnrolled { .. }));
    }

    #[tokio::test]
    async fn test_link_unknown_employee() {
        let (_pool, registry) = setup().await;
        let err = registry.link(404, &"1".into()).await.unwrap_err();
        assert!(matches!(err, RegistryError::EmployeeNotFound(404)));
    }

    #[tokio::test]
    async fn test_unlink_is_idempotent() {
        let (pool, registry) = setup().await;
        let alice = hire(&pool, "Alice").await;
        registry.link(alice.id, &"8".into()).await.unwrap();

        assert_eq!(
            registry.unlink(alice.id).await.unwrap(),
            Some(EnrollmentId::from("8"))
        );
        assert_eq!(registry.unlink(alice.id).await.unwrap(), None);
        assert!(registry.find_by_enrollment_id(&"8".into()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_orphans() {
        let (pool, registry) = setup().await;
        let alice = hire(&pool, "Alice").await;
        registry.link(alice.id, &"1".into()).await.unwrap();

        let device: Vec<EnrollmentId> = vec!["1".into(), "2".into(), "5".into()];
        let orphans = registry.list_orphans(&device).await.unwrap();

        assert_eq!(
            orphans.into_iter().collect::<Vec<_>>(),
            vec![EnrollmentId::from("2"), EnrollmentId::from("5")]
        );
    }

    #[tokio::test]
    async fn test_release_by_enrollment() {
        let (pool, registry) = setup().await;
        let alice = hire(&pool, "Alice").await;
        registry.link(alice.id, &"4".into()).await.unwrap();

        assert_eq!(registry.release(&"4".into()).await.unwrap(), Some(alice.id));
        assert_eq!(registry.release(&"4".into()).await.unwrap(), None);
    }
}

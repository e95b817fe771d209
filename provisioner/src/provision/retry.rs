use shared_types::{BucketName, ProvisionOutcome};
use tracing::warn;

use crate::error::ProvisionError;

/// Total creation attempts, the first one included.
pub const MAX_BUCKET_ATTEMPTS: u32 = 3;

/// Run `attempt` against `base`, and on every name collision against
/// `<base>-<suffix()>`, until one attempt succeeds, one fails fatally, or
/// `max_attempts` have been spent.
///
/// Suffixes are always appended to `base`, never stacked on a previous
/// candidate.
pub async fn attempt_with_renaming<S, F, Fut>(
    base: &BucketName,
    max_attempts: u32,
    mut suffix: S,
    mut attempt: F,
) -> Result<(BucketName, ProvisionOutcome), ProvisionError>
where
    S: FnMut() -> String,
    F: FnMut(BucketName) -> Fut,
    Fut: Future<Output = ProvisionOutcome>,
{
    let mut candidate = base.clone();

    for attempt_number in 1..=max_attempts {
        let outcome = attempt(candidate.clone()).await;
        if outcome.is_success() {
            return Ok((candidate, outcome));
        }
        if let ProvisionOutcome::Fatal(reason) = outcome {
            return Err(ProvisionError::BucketCreationFailed {
                bucket: candidate.to_string(),
                reason,
            });
        }

        if attempt_number < max_attempts {
            let next = base.with_suffix(&suffix());
            warn!(
                taken = %candidate,
                next = %next,
                attempt = attempt_number,
                "bucket name belongs to another account"
            );
            candidate = next;
        } else {
            warn!(
                taken = %candidate,
                attempt = attempt_number,
                "bucket name belongs to another account; no attempts left"
            );
        }
    }

    Err(ProvisionError::BucketNamesExhausted {
        base: base.to_string(),
        attempts: max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn scripted(
        outcomes: Vec<ProvisionOutcome>,
    ) -> (
        RefCell<Vec<BucketName>>,
        RefCell<std::vec::IntoIter<ProvisionOutcome>>,
    ) {
        (RefCell::new(Vec::new()), RefCell::new(outcomes.into_iter()))
    }

    #[tokio::test]
    async fn test_first_attempt_success() {
        let (seen, outcomes) = scripted(vec![ProvisionOutcome::NewlyCreated]);
        let base = BucketName::new("app-data-1");

        let (name, outcome) = attempt_with_renaming(&base, 3, || "deadbeef".into(), |name| {
            seen.borrow_mut().push(name);
            let next = outcomes.borrow_mut().next().unwrap();
            async move { next }
        })
        .await
        .unwrap();

        assert_eq!(name, base);
        assert_eq!(outcome, ProvisionOutcome::NewlyCreated);
        assert_eq!(seen.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_collision_renames_from_base() {
        let (seen, outcomes) = scripted(vec![
            ProvisionOutcome::CollisionRetry,
            ProvisionOutcome::CollisionRetry,
            ProvisionOutcome::AlreadySatisfied,
        ]);
        let mut suffixes = vec!["22222222", "11111111"];
        let base = BucketName::new("app-data-1");

        let (name, outcome) = attempt_with_renaming(
            &base,
            3,
            || suffixes.pop().unwrap().to_string(),
            |name| {
                seen.borrow_mut().push(name);
                let next = outcomes.borrow_mut().next().unwrap();
                async move { next }
            },
        )
        .await
        .unwrap();

        assert_eq!(name.as_str(), "app-data-1-22222222");
        assert_eq!(outcome, ProvisionOutcome::AlreadySatisfied);
        let seen: Vec<_> = seen.borrow().iter().map(ToString::to_string).collect();
        assert_eq!(
            seen,
            vec!["app-data-1", "app-data-1-11111111", "app-data-1-22222222"]
        );
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let (seen, outcomes) = scripted(vec![ProvisionOutcome::CollisionRetry; 5]);
        let base = BucketName::new("app-data-1");

        let err = attempt_with_renaming(&base, 3, || "abcdef01".into(), |name| {
            seen.borrow_mut().push(name);
            let next = outcomes.borrow_mut().next().unwrap();
            async move { next }
        })
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            ProvisionError::BucketNamesExhausted { attempts: 3, .. }
        ));
        assert_eq!(seen.borrow().len(), 3);
    }

    #[tokio::test]
    async fn test_no_suffix_drawn_after_last_attempt() {
        let (seen, outcomes) = scripted(vec![ProvisionOutcome::CollisionRetry; 3]);
        let drawn = RefCell::new(0_u32);
        let base = BucketName::new("app-data-1");

        let result = attempt_with_renaming(
            &base,
            3,
            || {
                *drawn.borrow_mut() += 1;
                format!("{:08x}", *drawn.borrow())
            },
            |name| {
                seen.borrow_mut().push(name);
                let next = outcomes.borrow_mut().next().unwrap();
                async move { next }
            },
        )
        .await;

        assert!(result.is_err());
        assert_eq!(*drawn.borrow(), 2);
        let seen: Vec<_> = seen.borrow().iter().map(ToString::to_string).collect();
        assert_eq!(
            seen,
            vec!["app-data-1", "app-data-1-00000001", "app-data-1-00000002"]
        );
    }

    #[tokio::test]
    async fn test_fatal_stops_immediately() {
        let (seen, outcomes) = scripted(vec![
            ProvisionOutcome::Fatal("AccessDenied".into()),
            ProvisionOutcome::NewlyCreated,
        ]);
        let base = BucketName::new("app-data-1");

        let err = attempt_with_renaming(&base, 3, || "abcdef01".into(), |name| {
            seen.borrow_mut().push(name);
            let next = outcomes.borrow_mut().next().unwrap();
            async move { next }
        })
        .await
        .unwrap_err();

        match err {
            ProvisionError::BucketCreationFailed { bucket, reason } => {
                assert_eq!(bucket, "app-data-1");
                assert_eq!(reason, "AccessDenied");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(seen.borrow().len(), 1);
    }
}

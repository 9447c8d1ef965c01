//! This module provides ways to tweak mocked task services, so that they can return errors on some tests
#![cfg(any(test, feature = "mocks"))]

/// This stores some behaviour tweaks, that describe how a mocked instance will behave during a given test
///
/// So that a functions fails _n_ times after _m_ initial successes, set `(m, n)` for the suited parameter
#[derive(Default, Clone, Debug)]
pub struct MockBehaviour {
    /// If this is true, every action will be allowed
    pub is_suspended: bool,

    // From the TaskService trait
    pub list_tasks_behaviour: (u32, u32),
    pub add_task_behaviour: (u32, u32),
    pub delete_task_behaviour: (u32, u32),
    pub mark_complete_behaviour: (u32, u32),
    pub update_task_behaviour: (u32, u32),
}

impl MockBehaviour {
    pub fn new() -> Self {
        Self::default()
    }

    /// All items will fail at once, for `n_fails` times
    pub fn fail_now(n_fails: u32) -> Self {
        Self {
            is_suspended: false,
            list_tasks_behaviour: (0, n_fails),
            add_task_behaviour: (0, n_fails),
            delete_task_behaviour: (0, n_fails),
            mark_complete_behaviour: (0, n_fails),
            update_task_behaviour: (0, n_fails),
        }
    }

    /// Suspend this mock behaviour until you call `resume`
    pub fn suspend(&mut self) {
        self.is_suspended = true;
    }
    /// Make this behaviour active again
    pub fn resume(&mut self) {
        self.is_suspended = false;
    }

    pub fn can_list_tasks(&mut self) -> Result<(), String> {
        let suspended = self.is_suspended;
        next_outcome(&mut self.list_tasks_behaviour, suspended, "listing")
    }
    pub fn can_add_task(&mut self) -> Result<(), String> {
        let suspended = self.is_suspended;
        next_outcome(&mut self.add_task_behaviour, suspended, "creation")
    }
    pub fn can_delete_task(&mut self) -> Result<(), String> {
        let suspended = self.is_suspended;
        next_outcome(&mut self.delete_task_behaviour, suspended, "deletion")
    }
    pub fn can_mark_complete(&mut self) -> Result<(), String> {
        let suspended = self.is_suspended;
        next_outcome(&mut self.mark_complete_behaviour, suspended, "completion toggle")
    }
    pub fn can_update_task(&mut self) -> Result<(), String> {
        let suspended = self.is_suspended;
        next_outcome(&mut self.update_task_behaviour, suspended, "update")
    }
}


/// Consume one step of a `(successes, failures)` script. Successes are used up first, then failures.
/// An exhausted script always succeeds.
fn next_outcome(script: &mut (u32, u32), suspended: bool, operation: &str) -> Result<(), String> {
    if suspended {
        return Ok(());
    }

    match script {
        (successes, _) if *successes > 0 => {
            *successes -= 1;
            Ok(())
        },
        (_, failures) if *failures > 0 => {
            *failures -= 1;
            log::debug!("Mock behaviour: this {} fails, {} more scripted failure(s)", operation, failures);
            Err(format!("Scripted failure of a {}", operation))
        },
        _ => Ok(()),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_mock_behaviour() {
        let mut ok = MockBehaviour::new();
        for _ in 0..5 {
            assert!(ok.can_list_tasks().is_ok());
            assert!(ok.can_mark_complete().is_ok());
        }

        let mut now = MockBehaviour::fail_now(2);
        assert!(now.can_list_tasks().is_err());
        assert!(now.can_add_task().is_err());
        assert!(now.can_add_task().is_err());
        assert!(now.can_list_tasks().is_err());
        assert!(now.can_list_tasks().is_ok());
        assert!(now.can_list_tasks().is_ok());
        assert!(now.can_add_task().is_ok());

        let mut custom = MockBehaviour{
            delete_task_behaviour: (0,1),
            update_task_behaviour: (1,3),
            ..MockBehaviour::default()
        };
        assert!(custom.can_delete_task().is_err());
        assert!(custom.can_delete_task().is_ok());
        assert!(custom.can_delete_task().is_ok());
        assert!(custom.can_update_task().is_ok());
        assert!(custom.can_update_task().is_err());
        assert!(custom.can_update_task().is_err());
        assert!(custom.can_update_task().is_err());
        assert!(custom.can_update_task().is_ok());
    }

    #[test]
    fn scripts_are_consumed_in_order() {
        let mut behaviour = MockBehaviour { mark_complete_behaviour: (1, 1), ..MockBehaviour::default() };
        assert!(behaviour.can_mark_complete().is_ok());
        assert_eq!(behaviour.mark_complete_behaviour, (0, 1));
        assert_eq!(behaviour.can_mark_complete(), Err("Scripted failure of a completion toggle".to_string()));
        assert_eq!(behaviour.mark_complete_behaviour, (0, 0));
        assert!(behaviour.can_mark_complete().is_ok());
        assert_eq!(behaviour.mark_complete_behaviour, (0, 0));
    }

    #[test]
    fn suspended_behaviour_allows_everything() {
        let mut behaviour = MockBehaviour::fail_now(10);
        behaviour.suspend();
        assert!(behaviour.can_delete_task().is_ok());
        behaviour.resume();
        assert!(behaviour.can_delete_task().is_err());
    }
}

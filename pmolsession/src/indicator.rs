use std::sync::Arc;

/// Indicateur matériel d'activité (LED de statut). Fire-and-forget :
/// un échec d'indication ne doit jamais faire échouer l'opération signalée.
pub trait StatusIndicator: Send + Sync {
    fn indicate(&self, active: bool);
}

/// Indicateur nul, pour les hôtes sans LED et pour les tests.
#[derive(Debug, Default)]
pub struct NullIndicator;

impl StatusIndicator for NullIndicator {
    fn indicate(&self, _active: bool) {}
}

/// Garde d'activité : allume l'indicateur à la construction et l'éteint
/// au drop, donc sur tous les chemins de sortie, succès comme échec.
pub struct IndicatorGuard {
    indicator: Arc<dyn StatusIndicator>,
}

impl IndicatorGuard {
    pub fn hold(indicator: &Arc<dyn StatusIndicator>) -> Self {
        indicator.indicate(true);
        Self {
            indicator: Arc::clone(indicator),
        }
    }
}

impl Drop for IndicatorGuard {
    fn drop(&mut self) {
        self.indicator.indicate(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingIndicator {
        transitions: Mutex<Vec<bool>>,
    }

    impl StatusIndicator for RecordingIndicator {
        fn indicate(&self, active: bool) {
            self.transitions.lock().unwrap().push(active);
        }
    }

    #[test]
    fn test_guard_asserts_then_clears() {
        let recorder = Arc::new(RecordingIndicator::default());
        let indicator: Arc<dyn StatusIndicator> = recorder.clone();

        {
            let _guard = IndicatorGuard::hold(&indicator);
            assert_eq!(*recorder.transitions.lock().unwrap(), vec![true]);
        }

        assert_eq!(*recorder.transitions.lock().unwrap(), vec![true, false]);
    }

    #[test]
    fn test_guard_clears_on_early_return() {
        let recorder = Arc::new(RecordingIndicator::default());
        let indicator: Arc<dyn StatusIndicator> = recorder.clone();

        fn failing(indicator: &Arc<dyn StatusIndicator>) -> Result<(), ()> {
            let _guard = IndicatorGuard::hold(indicator);
            Err(())
        }

        assert!(failing(&indicator).is_err());
        assert_eq!(*recorder.transitions.lock().unwrap(), vec![true, false]);
    }
}

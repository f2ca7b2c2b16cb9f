use beacon_emitter::Emitter;
use parking_lot::Mutex;
use proptest::prelude::*;
use std::sync::Arc;

proptest! {
    #[test]
    fn every_listener_runs_once_in_registration_order(
        once_flags in proptest::collection::vec(any::<bool>(), 0..32),
        payload in any::<i32>(),
    ) {
        let emitter = Emitter::<i32>::new();
        let calls = Arc::new(Mutex::new(Vec::new()));

        let ids: Vec<_> = once_flags
            .iter()
            .enumerate()
            .map(|(index, &once)| {
                let calls = Arc::clone(&calls);
                let callback = move |n: &i32| calls.lock().push((index, *n));
                let listener =
                    if once { emitter.once(callback) } else { emitter.on(callback) };
                (listener.id(), once)
            })
            .collect();
        prop_assert!(ids.windows(2).all(|w| w[0].0 < w[1].0));

        emitter.emit(&payload);
        let expected: Vec<_> = (0..once_flags.len()).map(|index| (index, payload)).collect();
        prop_assert_eq!(calls.lock().clone(), expected);

        let persistent = once_flags.iter().filter(|&&once| !once).count();
        prop_assert_eq!(emitter.listeners_count(), persistent);

        calls.lock().clear();
        emitter.emit(&payload.wrapping_add(1));
        let survivors: Vec<_> = calls.lock().iter().map(|&(index, _)| index).collect();
        let expected: Vec<_> =
            once_flags.iter().enumerate().filter(|(_, once)| !**once).map(|(i, _)| i).collect();
        prop_assert_eq!(survivors.len(), persistent);
        prop_assert_eq!(survivors, expected);
    }

    #[test]
    fn removal_by_handle_only_affects_that_listener(
        count in 1usize..24,
        remove_mask in proptest::collection::vec(any::<bool>(), 24),
    ) {
        let emitter = Emitter::<()>::new();
        let listeners: Vec<_> = (0..count).map(|_| emitter.on(|_| {})).collect();

        let mut expected = count;
        for (listener, &remove) in listeners.iter().zip(&remove_mask) {
            if remove {
                listener.remove();
                listener.remove();
                expected -= 1;
            }
        }

        prop_assert_eq!(emitter.listeners_count(), expected);
        for (listener, &remove) in listeners.iter().zip(&remove_mask) {
            prop_assert_eq!(emitter.contains(listener), !remove);
        }
    }
}

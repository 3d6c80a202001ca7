mod tests {
    use myrtio_strip_controller::{EventQueue, EventSink, ModeId, PowerState, StateEvent, SyncSink};

    #[test]
    fn test_queue_is_fifo() {
        let queue = EventQueue::<4>::new();
        let sink = EventSink::new(&queue);
        sink.sync_state(PowerState::On);
        sink.sync_mode(ModeId::Solid);
        sink.sync_length(42);

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.try_pop(), Some(StateEvent::State(PowerState::On)));
        assert_eq!(queue.try_pop(), Some(StateEvent::Mode(ModeId::Solid)));
        assert_eq!(queue.try_pop(), Some(StateEvent::Length(42)));
        assert_eq!(queue.try_pop(), None);
    }

    #[test]
    fn test_full_queue_drops_newest() {
        let queue = EventQueue::<2>::new();
        let sink = EventSink::new(&queue);
        sink.sync_brightness(1);
        sink.sync_brightness(2);
        sink.sync_brightness(3);

        assert_eq!(queue.len(), 2);
        assert!(queue.try_push(StateEvent::Brightness(4)).is_err());
        assert_eq!(queue.try_pop(), Some(StateEvent::Brightness(1)));
        assert_eq!(queue.try_pop(), Some(StateEvent::Brightness(2)));
        assert!(queue.is_empty());
    }
}

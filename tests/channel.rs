mod tests {
    use chrono::Local;
    use rail_board::channel::Channel;
    use rail_board::{BoardUpdate, UpdateChannel};

    #[test]
    fn test_send_receive_in_order() {
        let channel: Channel<u32, 4> = Channel::new();
        let sender = channel.sender();
        let receiver = channel.receiver();

        assert!(channel.is_empty());
        assert_eq!(sender.send(1), None);
        assert_eq!(sender.send(2), None);
        assert_eq!(channel.len(), 2);

        assert_eq!(receiver.try_receive(), Some(1));
        assert_eq!(receiver.try_receive(), Some(2));
        assert_eq!(receiver.try_receive(), None);
    }

    #[test]
    fn test_full_channel_evicts_oldest() {
        let channel: Channel<u32, 2> = Channel::new();
        let sender = channel.sender();

        assert_eq!(sender.send(1), None);
        assert_eq!(sender.send(2), None);
        assert_eq!(sender.send(3), Some(1));
        assert_eq!(sender.send(4), Some(2));
        assert_eq!(channel.len(), 2);

        let mut received = Vec::new();
        let drained = channel.receiver().drain(|value| received.push(value));
        assert_eq!(drained, 2);
        assert_eq!(received, vec![3, 4]);
        assert!(channel.is_empty());
    }

    #[test]
    fn test_send_across_threads() {
        static CHANNEL: Channel<u32, 8> = Channel::new();

        std::thread::scope(|scope| {
            scope.spawn(|| {
                for value in 0..20 {
                    CHANNEL.sender().send(value);
                }
            });
        });

        let mut received = Vec::new();
        CHANNEL.receiver().drain(|value| received.push(value));
        assert_eq!(received, (12..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_expendable_values_evicted_first() {
        let channel: Channel<u32, 3> = Channel::new();
        let sender = channel.sender();
        let odd = |value: &u32| value % 2 == 1;

        sender.send(2);
        sender.send(3);
        sender.send(4);
        assert_eq!(sender.send_evicting(6, odd), Some(3));
        // Nothing expendable left: fall back to the oldest
        assert_eq!(sender.send_evicting(8, odd), Some(2));

        let mut received = Vec::new();
        channel.receiver().drain(|value| received.push(value));
        assert_eq!(received, vec![4, 6, 8]);
    }

    #[test]
    fn test_failures_never_push_out_departures() {
        let channel: UpdateChannel<2> = UpdateChannel::new();
        let sender = channel.sender();
        let failure = || BoardUpdate::FetchFailed {
            reason: "timed out".to_owned(),
            at: Local::now(),
        };

        sender.send_evicting(
            BoardUpdate::Departures {
                records: Vec::new(),
                fetched_at: Local::now(),
            },
            BoardUpdate::is_failure,
        );
        for _ in 0..5 {
            sender.send_evicting(failure(), BoardUpdate::is_failure);
        }

        let mut received = Vec::new();
        channel.receiver().drain(|update| received.push(update));
        assert_eq!(received.len(), 2);
        assert!(!received[0].is_failure());
        assert!(received[1].is_failure());
    }
}

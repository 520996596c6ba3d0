mod tests {
    use chrono::{Local, NaiveTime};
    use rail_board::driver::MemoryDriver;
    use rail_board::{
        BoardLayout, BoardUpdate, DepartureRecord, Duration, EstimatedTime, FeedStatus,
        FrameScheduler, Instant, Palette, Renderer, UpdateChannel,
    };

    const CHANNEL_SIZE: usize = 4;

    fn renderer() -> Renderer {
        Renderer::new(BoardLayout::new(64, 32, 2).unwrap(), Palette::default(), "NTN")
    }

    fn clock() -> NaiveTime {
        NaiveTime::from_hms_opt(9, 30, 0).unwrap()
    }

    fn departures(destination: &str) -> BoardUpdate {
        BoardUpdate::Departures {
            records: vec![DepartureRecord::new(
                destination,
                Some("1".to_owned()),
                NaiveTime::from_hms_opt(9, 45, 0),
                EstimatedTime::OnTime,
                false,
            )],
            fetched_at: Local::now(),
        }
    }

    #[test]
    fn test_tick_applies_updates() {
        let channel: UpdateChannel<CHANNEL_SIZE> = UpdateChannel::new();
        let mut scheduler = FrameScheduler::new(renderer(), channel.receiver(), MemoryDriver::new());

        let result = scheduler.tick(Instant::from_millis(0), clock());
        assert!(!result.updates.has_effects());
        assert_eq!(scheduler.health().status(), FeedStatus::Waiting);

        channel.sender().send(departures("Lanark"));
        let result = scheduler.tick(Instant::from_millis(50), clock());
        assert_eq!(result.updates.refreshed, 1);
        assert_eq!(result.updates.failures, 0);
        assert_eq!(scheduler.health().status(), FeedStatus::Live);
        assert_eq!(scheduler.state().departures()[0].destination(), "Lanark");
        assert!(channel.is_empty());
    }

    #[test]
    fn test_latest_snapshot_wins() {
        let channel: UpdateChannel<CHANNEL_SIZE> = UpdateChannel::new();
        let mut scheduler = FrameScheduler::new(renderer(), channel.receiver(), MemoryDriver::new());

        channel.sender().send(departures("Lanark"));
        channel.sender().send(BoardUpdate::FetchFailed {
            reason: "timed out".to_owned(),
            at: Local::now(),
        });
        channel.sender().send(departures("Motherwell"));

        let result = scheduler.tick(Instant::from_millis(0), clock());
        assert_eq!(result.updates.refreshed, 2);
        assert_eq!(result.updates.failures, 1);
        assert_eq!(scheduler.state().departures()[0].destination(), "Motherwell");
    }

    #[test]
    fn test_every_tick_writes_a_frame() {
        let channel: UpdateChannel<CHANNEL_SIZE> = UpdateChannel::new();
        let mut scheduler = FrameScheduler::new(renderer(), channel.receiver(), MemoryDriver::new());

        for frame in 0..5_u64 {
            scheduler.tick(Instant::from_millis(frame * 50), clock());
        }
        assert_eq!(scheduler.output().frames_written(), 5);
        assert_eq!(scheduler.output().last_frame(), Some(scheduler.canvas()));
    }

    #[test]
    fn test_scroll_advances_after_frame() {
        let channel: UpdateChannel<CHANNEL_SIZE> = UpdateChannel::new();
        let mut scheduler = FrameScheduler::new(renderer(), channel.receiver(), MemoryDriver::new())
            .with_scroll_step(2);

        channel.sender().send(departures("Glasgow Central via Hamilton"));
        scheduler.tick(Instant::from_millis(0), clock());
        assert_eq!(scheduler.state().scroll_offset(0), 2);

        // The written frame still shows offset 0
        let mut expected = rail_board::FrameBuffer::new(64, 32);
        let mut unscrolled = rail_board::BoardState::new(2);
        if let BoardUpdate::Departures {
            records,
            fetched_at,
        } = departures("Glasgow Central via Hamilton")
        {
            unscrolled.replace_departures(records, fetched_at);
        }
        let Ok(()) = scheduler
            .renderer()
            .render(&mut expected, &unscrolled, scheduler.health(), clock());
        assert_eq!(scheduler.output().last_frame(), Some(&expected));

        scheduler.tick(Instant::from_millis(50), clock());
        assert_eq!(scheduler.state().scroll_offset(0), 4);
    }

    #[test]
    fn test_sleep_duration() {
        let channel: UpdateChannel<CHANNEL_SIZE> = UpdateChannel::new();
        let mut scheduler = FrameScheduler::new(renderer(), channel.receiver(), MemoryDriver::new());
        assert_eq!(scheduler.frame_duration(), Duration::from_millis(50));

        let result = scheduler.tick(Instant::from_millis(0), clock());
        assert_eq!(result.next_deadline, Instant::from_millis(50));
        assert_eq!(result.sleep_duration, Duration::from_millis(50));

        let result = scheduler.tick(Instant::from_millis(60), clock());
        assert_eq!(result.next_deadline, Instant::from_millis(100));
        assert_eq!(result.sleep_duration, Duration::from_millis(40));

        // Running behind but within the drift budget: no sleep, no reset
        let result = scheduler.tick(Instant::from_millis(180), clock());
        assert_eq!(result.next_deadline, Instant::from_millis(150));
        assert_eq!(result.sleep_duration, Duration::from_millis(0));
    }

    #[test]
    fn test_drift_resets_schedule() {
        let channel: UpdateChannel<CHANNEL_SIZE> = UpdateChannel::new();
        let mut scheduler = FrameScheduler::with_frame_duration(
            renderer(),
            channel.receiver(),
            MemoryDriver::new(),
            Duration::from_millis(100),
        );

        scheduler.tick(Instant::from_millis(0), clock());
        let result = scheduler.tick(Instant::from_millis(5_000), clock());
        assert_eq!(result.next_deadline, Instant::from_millis(5_100));
        assert_eq!(result.sleep_duration, Duration::from_millis(100));
    }
}

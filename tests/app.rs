mod tests {
    use std::sync::atomic::AtomicBool;

    use chrono::NaiveTime;
    use rail_board::app::{self, AppError};
    use rail_board::config::{BoardConfig, ConfigError};
    use rail_board::driver::MemoryDriver;
    use rail_board::{DepartureRecord, DepartureSource, EstimatedTime, FetchError};

    struct FixedSource(Vec<DepartureRecord>);

    impl DepartureSource for FixedSource {
        fn fetch(&self, _station: &str) -> Result<Vec<DepartureRecord>, FetchError> {
            Ok(self.0.clone())
        }
    }

    struct DownSource;

    impl DepartureSource for DownSource {
        fn fetch(&self, _station: &str) -> Result<Vec<DepartureRecord>, FetchError> {
            Err(FetchError::Status(503))
        }
    }

    fn departures() -> Vec<DepartureRecord> {
        vec![DepartureRecord::new(
            "Glasgow Central",
            Some("1".to_owned()),
            NaiveTime::from_hms_opt(14, 5, 0),
            EstimatedTime::OnTime,
            false,
        )]
    }

    #[test]
    fn test_run_stops_after_max_frames() {
        let running = AtomicBool::new(true);
        let driver = app::run(
            &BoardConfig::default(),
            FixedSource(departures()),
            MemoryDriver::new(),
            &running,
            Some(3),
        )
        .unwrap();

        assert_eq!(driver.frames_written(), 3);
        assert!(driver.is_cleared());
        let frame = driver.last_frame().unwrap();
        assert_eq!(frame.lit_pixels().count(), 0);
    }

    #[test]
    fn test_run_survives_unreachable_upstream() {
        let running = AtomicBool::new(true);
        let driver = app::run(
            &BoardConfig::default(),
            DownSource,
            MemoryDriver::new(),
            &running,
            Some(2),
        )
        .unwrap();
        assert_eq!(driver.frames_written(), 2);
    }

    #[test]
    fn test_run_without_running_draws_nothing() {
        let running = AtomicBool::new(false);
        let driver = app::run(
            &BoardConfig::default(),
            DownSource,
            MemoryDriver::new(),
            &running,
            None,
        )
        .unwrap();
        assert_eq!(driver.frames_written(), 0);
    }

    #[test]
    fn test_run_rejects_bad_geometry() {
        let mut config = BoardConfig::default();
        config.display.visible_rows = 3;
        let running = AtomicBool::new(true);
        let result = app::run(&config, DownSource, MemoryDriver::new(), &running, Some(1));
        assert!(matches!(result, Err(AppError::Config(ConfigError::Layout(_)))));
    }
}

mod tests {
    use chrono::{Local, NaiveTime};
    use rail_board::color::rgb_from_u32;
    use rail_board::{
        BoardLayout, BoardState, DepartureRecord, EstimatedTime, FeedHealth, FrameBuffer, Palette,
        Renderer, Rgb,
    };

    const HEADER_HEIGHT: i32 = 8;
    const ROW_HEIGHT: i32 = 12;
    const CLOCK_X: i32 = 24;

    fn palette() -> Palette {
        Palette {
            on_time: rgb_from_u32(0x00_FF_00),
            delayed: rgb_from_u32(0xFF_A5_00),
            cancelled: rgb_from_u32(0xFF_00_00),
            clock: rgb_from_u32(0xFF_FF_FF),
            header: rgb_from_u32(0x00_00_FF),
            error: rgb_from_u32(0xFF_00_FF),
            notice: rgb_from_u32(0x00_FF_FF),
        }
    }

    fn renderer() -> Renderer {
        Renderer::new(BoardLayout::new(64, 32, 2).unwrap(), palette(), "NTN")
    }

    fn clock() -> NaiveTime {
        NaiveTime::from_hms_opt(14, 3, 27).unwrap()
    }

    fn record(destination: &str, estimated: EstimatedTime, cancelled: bool) -> DepartureRecord {
        DepartureRecord::new(
            destination,
            Some("2".to_owned()),
            NaiveTime::from_hms_opt(14, 5, 0),
            estimated,
            cancelled,
        )
    }

    /// Health matching a board fed only by successful fetches
    fn health_for(state: &BoardState) -> FeedHealth {
        let mut health = FeedHealth::new();
        if state.has_data() {
            health.record_success();
        }
        health
    }

    fn render_with(state: &BoardState, health: &FeedHealth) -> FrameBuffer {
        let mut frame = FrameBuffer::new(64, 32);
        let Ok(()) = renderer().render(&mut frame, state, health, clock());
        frame
    }

    fn render(state: &BoardState) -> FrameBuffer {
        render_with(state, &health_for(state))
    }

    fn colors_in(frame: &FrameBuffer, rows: std::ops::Range<i32>) -> Vec<Rgb> {
        let mut colors: Vec<Rgb> = frame
            .lit_pixels()
            .filter(|(_, y, _)| rows.contains(y))
            .map(|(_, _, color)| color)
            .collect();
        colors.dedup();
        colors
    }

    #[test]
    fn test_render_is_idempotent() {
        let mut state = BoardState::new(2);
        state.replace_departures(
            vec![record("Glasgow Central via Hamilton", EstimatedTime::OnTime, false)],
            Local::now(),
        );

        let first = render(&state);
        let second = render(&state);
        assert_eq!(first, second);

        // Drawing over a dirty buffer gives the same frame
        let mut dirty = FrameBuffer::new(64, 32);
        dirty.set_pixel(40, 20, rgb_from_u32(0x12_34_56));
        let Ok(()) = renderer().render(&mut dirty, &state, &health_for(&state), clock());
        assert_eq!(dirty, first);
    }

    #[test]
    fn test_header_colors() {
        let frame = render(&BoardState::new(2));
        let palette = palette();

        let mut station = false;
        let mut clock = false;
        for (x, y, color) in frame.lit_pixels() {
            if y >= HEADER_HEIGHT {
                continue;
            }
            if x < CLOCK_X {
                assert_eq!(color, palette.header);
                station = true;
            } else {
                assert_eq!(color, palette.clock);
                clock = true;
            }
        }
        assert!(station);
        assert!(clock);
    }

    #[test]
    fn test_clock_changes_frame() {
        let state = BoardState::new(2);
        let mut earlier = FrameBuffer::new(64, 32);
        let mut later = FrameBuffer::new(64, 32);
        let Ok(()) = renderer().render(&mut earlier, &state, &FeedHealth::new(), clock());
        let next = NaiveTime::from_hms_opt(14, 3, 28).unwrap();
        let Ok(()) = renderer().render(&mut later, &state, &FeedHealth::new(), next);
        assert_ne!(earlier, later);
    }

    #[test]
    fn test_waiting_body_is_blank() {
        let frame = render(&BoardState::new(2));
        assert!(colors_in(&frame, HEADER_HEIGHT..32).is_empty());
    }

    #[test]
    fn test_unreachable_banner() {
        let state = BoardState::new(2);
        let mut health = FeedHealth::new();
        health.record_failure("timed out", Local::now());
        let frame = render_with(&state, &health);
        assert_eq!(colors_in(&frame, HEADER_HEIGHT..32), vec![palette().error]);
    }

    #[test]
    fn test_no_data_banner() {
        let mut state = BoardState::new(2);
        state.replace_departures(Vec::new(), Local::now());
        let frame = render(&state);
        assert_eq!(colors_in(&frame, HEADER_HEIGHT..32), vec![palette().notice]);
    }

    #[test]
    fn test_stale_departures_survive_failure() {
        let mut state = BoardState::new(2);
        state.replace_departures(
            vec![record("Lanark", EstimatedTime::OnTime, false)],
            Local::now(),
        );
        let mut health = health_for(&state);
        let before = render_with(&state, &health);
        health.record_failure("timed out", Local::now());
        assert_eq!(render_with(&state, &health), before);
    }

    #[test]
    fn test_row_color_follows_status() {
        let palette = palette();
        let first_row = HEADER_HEIGHT..HEADER_HEIGHT + ROW_HEIGHT;
        let second_row = HEADER_HEIGHT + ROW_HEIGHT..32;

        let late = EstimatedTime::At(NaiveTime::from_hms_opt(14, 22, 0).unwrap());
        let cases = [
            (record("Lanark", EstimatedTime::OnTime, false), palette.on_time),
            (record("Lanark", late, false), palette.delayed),
            (record("Lanark", EstimatedTime::OnTime, true), palette.cancelled),
        ];

        for (departure, expected) in cases {
            let mut state = BoardState::new(2);
            state.replace_departures(
                vec![departure, record("Motherwell", EstimatedTime::OnTime, false)],
                Local::now(),
            );
            let frame = render(&state);
            assert_eq!(colors_in(&frame, first_row.clone()), vec![expected]);
            assert_eq!(colors_in(&frame, second_row.clone()), vec![palette.on_time]);
        }
    }

    #[test]
    fn test_extra_departures_are_not_drawn() {
        let mut two = BoardState::new(2);
        two.replace_departures(
            vec![
                record("Lanark", EstimatedTime::OnTime, false),
                record("Motherwell", EstimatedTime::OnTime, false),
            ],
            Local::now(),
        );
        let mut three = BoardState::new(2);
        three.replace_departures(
            vec![
                record("Lanark", EstimatedTime::OnTime, false),
                record("Motherwell", EstimatedTime::OnTime, false),
                record("Dalmuir", EstimatedTime::OnTime, true),
            ],
            Local::now(),
        );
        assert_eq!(render(&two), render(&three));
    }

    #[test]
    fn test_scroll_offset_moves_destination() {
        let layout = BoardLayout::new(64, 32, 2).unwrap();
        let mut state = BoardState::new(2);
        state.replace_departures(
            vec![record("Glasgow Central via Hamilton", EstimatedTime::OnTime, false)],
            Local::now(),
        );
        let before = render(&state);
        state.advance_scroll(&layout, 4);
        let after = render(&state);
        assert_ne!(before, after);

        // Only the destination line moves
        let status_line = HEADER_HEIGHT + 6..HEADER_HEIGHT + ROW_HEIGHT;
        for y in status_line {
            for x in 0..64 {
                assert_eq!(before.pixel(x, y), after.pixel(x, y));
            }
        }
    }
}

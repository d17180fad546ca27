//! Tests for gn-output.

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use crate::csv::{CsvTraceWriter, EVENTS_FILE, POSITIONS_FILE};
    use crate::row::{EventRow, PositionRow};
    use crate::writer::TraceWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn read(path: std::path::PathBuf) -> (Vec<String>, Vec<csv::StringRecord>) {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        let headers = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        let rows = rdr.records().map(|r| r.unwrap()).collect();
        (headers, rows)
    }

    #[test]
    fn files_and_headers() {
        let dir = tmp();
        let out = dir.path().join("nested/trace");
        let mut w = CsvTraceWriter::new(&out).unwrap();
        w.finish().unwrap();

        let (headers, rows) = read(out.join(POSITIONS_FILE));
        assert_eq!(headers, ["tick", "agent", "x", "y", "phase"]);
        assert!(rows.is_empty());
        let (headers, _) = read(out.join(EVENTS_FILE));
        assert_eq!(headers, ["tick", "agent", "event", "cell_x", "cell_y"]);
    }

    #[test]
    fn position_rows_are_written() {
        let dir = tmp();
        let mut w = CsvTraceWriter::new(dir.path()).unwrap();
        w.write_positions(&[
            PositionRow { tick: 4, agent: 0, x: 1.5, y: 2.25, phase: "following" },
            PositionRow { tick: 4, agent: 3, x: 0.0, y: 0.0, phase: "idle" },
        ])
        .unwrap();
        w.finish().unwrap();
        w.finish().unwrap();

        let (_, rows) = read(dir.path().join(POSITIONS_FILE));
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "4");
        assert_eq!(&rows[0][2], "1.5000");
        assert_eq!(&rows[0][3], "2.2500");
        assert_eq!(&rows[0][4], "following");
        assert_eq!(&rows[1][1], "3");
    }

    #[test]
    fn events_without_cell_leave_columns_empty() {
        let dir = tmp();
        let mut w = CsvTraceWriter::new(dir.path()).unwrap();
        w.write_event(&EventRow { tick: 9, agent: 2, event: "arrived", cell_x: Some(5), cell_y: Some(-1) })
            .unwrap();
        w.write_event(&EventRow { tick: 10, agent: 2, event: "stuck", cell_x: None, cell_y: None })
            .unwrap();
        w.finish().unwrap();

        let (_, rows) = read(dir.path().join(EVENTS_FILE));
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][2], "arrived");
        assert_eq!(&rows[0][3], "5");
        assert_eq!(&rows[0][4], "-1");
        assert_eq!(&rows[1][3], "");
    }
}

#[cfg(test)]
mod observer_tests {
    use gn_core::{AgentId, ArrivalReaction, CellCoord, Tick, UnitCategory, WorldPoint};
    use gn_grid::{AStarPathfinder, GridBuilder};
    use gn_sim::{NavConfig, SimBuilder, SimObserver};

    use crate::csv::{CsvTraceWriter, EVENTS_FILE, POSITIONS_FILE};
    use crate::row::{EventRow, PositionRow};
    use crate::writer::TraceWriter;
    use crate::{OutputError, OutputResult, TraceObserver};

    #[test]
    fn short_run_produces_positions_and_arrival() {
        let dir = tempfile::tempdir().unwrap();
        let grid = GridBuilder::new(8, 8, 1.0).build_open().unwrap();
        let pathfinder = AStarPathfinder::for_grid(&grid);
        let config = NavConfig { snapshot_interval_ticks: 10, ..Default::default() };
        let mut sim = SimBuilder::new(config, grid, pathfinder)
            .agent(UnitCategory::Cavalry, WorldPoint::new(0.5, 0.5))
            .agent(UnitCategory::Infantry, WorldPoint::new(7.5, 7.5))
            .build()
            .unwrap();
        sim.request_destination(AgentId(0), CellCoord::new(4, 0), false).unwrap();

        let mut obs = TraceObserver::new(CsvTraceWriter::new(dir.path()).unwrap());
        sim.run_ticks(100, &mut obs);
        assert!(obs.take_error().is_none());

        let mut rdr = csv::Reader::from_path(dir.path().join(POSITIONS_FILE)).unwrap();
        let positions = rdr.records().count();
        assert_eq!(positions, 10 * 2, "10 snapshots of 2 agents");

        let mut rdr = csv::Reader::from_path(dir.path().join(EVENTS_FILE)).unwrap();
        let events: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(events.len(), 1);
        assert_eq!(&events[0][1], "0");
        assert_eq!(&events[0][2], "arrived");
        assert_eq!(&events[0][3], "4");
    }

    /// Fails every write with a distinct message.
    struct FailingWriter {
        calls: usize,
    }

    impl TraceWriter for FailingWriter {
        fn write_positions(&mut self, _rows: &[PositionRow]) -> OutputResult<()> {
            self.fail()
        }
        fn write_event(&mut self, _row: &EventRow) -> OutputResult<()> {
            self.fail()
        }
        fn finish(&mut self) -> OutputResult<()> {
            Ok(())
        }
    }

    impl FailingWriter {
        fn fail(&mut self) -> OutputResult<()> {
            self.calls += 1;
            Err(OutputError::Io(std::io::Error::other(format!("write {}", self.calls))))
        }
    }

    #[test]
    fn first_error_is_kept() {
        let mut obs = TraceObserver::new(FailingWriter { calls: 0 });
        obs.on_stuck(Tick(1), AgentId(0), 1);
        obs.on_arrival(Tick(2), AgentId(0), CellCoord::new(1, 1), ArrivalReaction::None);
        let err = obs.take_error().unwrap();
        assert_eq!(err.to_string(), "I/O error: write 1");
        assert!(obs.take_error().is_none());
        assert_eq!(obs.into_writer().calls, 2);
    }
}

use crate::app::dispatcher::Dispatcher;
use crate::app::gates::GateController;
use crate::config::SorterConfig;
use crate::hal::Platform;
use crate::svc::capture::CaptureService;
use crate::svc::clock::Clock;
use crate::svc::protocol::{Command, Response};

pub mod dispatcher;
pub mod gates;

pub struct App<'a> {
    dispatcher: Dispatcher<'a>,
}

impl<'a> App<'a> {
    /// Closes every gate and announces readiness on the transport.
    ///
    /// A failed announcement is logged, the host can still send commands.
    pub fn new(platform: Platform<'a>, clock: &'a dyn Clock, config: &SorterConfig) -> Self {
        let Platform {
            servos,
            camera,
            transport,
        } = platform;

        let mut gates = GateController::new(servos, clock, config);
        gates.close_all();

        let capture = CaptureService::new(camera);
        let mut dispatcher = Dispatcher::new(transport, gates, capture);

        log::info!("Gates closed, announcing");
        if let Err(e) = dispatcher.send(Response::Ready) {
            log::error!("{e}");
        }

        Self { dispatcher }
    }

    /// Runs the next pending command to completion. `None` when the transport was idle.
    pub fn update(&mut self) -> Option<Command> {
        match self.dispatcher.step() {
            Ok(command) => command,
            Err(e) => {
                log::error!("{e}");
                None
            }
        }
    }

    pub fn gates(&self) -> &GateController<'a> {
        self.dispatcher.gates()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use insta::assert_snapshot;

    use crate::app::gates::Category;
    use crate::hal::camera::Camera;
    use crate::svc::client::SorterClient;
    use crate::svc::std_transport::StdTransport;
    use crate::svc::testing::{
        fake_servos, jpeg_like_frame, BrokenTransport, EventLog, FakeCamera, FakeClock,
    };

    use super::*;

    fn run_device(input: &[u8], camera: Option<FakeCamera>, log: &EventLog) -> Vec<u8> {
        let clock = FakeClock::new(log);
        let mut output = Vec::new();

        {
            let platform = Platform {
                servos: fake_servos(log),
                camera: camera.map(|c| Box::new(c) as Box<dyn Camera>),
                transport: Box::new(StdTransport::new(input, &mut output)),
            };

            let mut app = App::new(platform, &clock, &SorterConfig::default());
            assert!(app.gates().positions().all_closed());

            while app.update().is_some() {}

            assert!(app.gates().positions().all_closed());
        }

        output
    }

    #[test_log::test]
    fn test_startup_closes_gates_and_announces() {
        let log = EventLog::default();
        let output = run_device(b"", None, &log);

        assert_eq!(output, b"System ready!\n");
        for gate in ["entrance", "plastic", "paper", "aluminium"] {
            assert_eq!(log.writes_to(gate), vec![0], "{gate}");
        }
    }

    #[test_log::test]
    fn test_device_serves_host_client() {
        let log = EventLog::default();
        let frame = jpeg_like_frame(4096);
        let camera = FakeCamera::with_frames([frame.clone()]);

        let output = run_device(b"capture\ncan\ncapture\n", Some(camera), &log);

        let mut client = SorterClient::new(&output[..], Vec::new());
        client.wait_ready().unwrap();
        assert_eq!(client.capture().unwrap(), frame);
        client.route(Category::Aluminium).unwrap();
        assert!(client.capture().is_err());

        let (_, sent) = client.into_inner();
        assert_eq!(sent, b"capture\ncan\ncapture\n");
    }

    #[test_log::test]
    fn test_failed_writes_do_not_stop_the_loop() {
        struct FlakyTransport {
            lines: Vec<&'static str>,
            writes: usize,
        }

        impl crate::hal::transport::Transport for FlakyTransport {
            fn read_line(&mut self) -> anyhow::Result<Option<String>> {
                Ok(self.lines.pop().map(str::to_owned))
            }

            fn write_all(&mut self, _data: &[u8]) -> anyhow::Result<()> {
                self.writes += 1;
                if self.writes > 1 {
                    anyhow::bail!("tx buffer full")
                }
                Ok(())
            }
        }

        let log = EventLog::default();
        let clock = FakeClock::new(&log);
        let platform = Platform {
            servos: fake_servos(&log),
            camera: None,
            transport: Box::new(FlakyTransport {
                lines: vec!["plastic", "paper"],
                writes: 0,
            }),
        };

        let mut app = App::new(platform, &clock, &SorterConfig::default());

        assert_eq!(app.update(), None);
        assert_eq!(log.writes_to("paper"), vec![0, 0, 90, 0]);

        assert_eq!(app.update(), None);
        assert_eq!(log.writes_to("plastic"), vec![0, 0, 0, 90, 0]);
        assert!(app.gates().positions().all_closed());
    }

    #[test_log::test]
    fn test_failed_announcement_does_not_stop_startup() {
        let log = EventLog::default();
        let clock = FakeClock::new(&log);
        let platform = Platform {
            servos: fake_servos(&log),
            camera: None,
            transport: Box::new(BrokenTransport {
                lines: VecDeque::from(["plastic".to_owned()]),
            }),
        };

        let mut app = App::new(platform, &clock, &SorterConfig::default());
        assert!(app.gates().positions().all_closed());

        assert_eq!(app.update(), None);
        assert_eq!(log.writes_to("plastic"), vec![0, 0, 90, 0]);
        assert!(app.gates().positions().all_closed());
    }

    #[test]
    fn test_unrecognized_produces_no_output() {
        let log = EventLog::default();
        let output = run_device(b"banana\n", None, &log);

        assert_snapshot!(String::from_utf8(output).unwrap(), @"System ready!");
        assert_eq!(log.writes_to("entrance"), vec![0]);
    }
}

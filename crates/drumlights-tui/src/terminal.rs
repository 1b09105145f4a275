//! Terminal driver.
//!
//! Implements [`Driver`] with ratatui for output, crossterm's event stream
//! for keys, and a tokio-tungstenite socket task per connection attempt.
//! Each attempt gets a generation number; socket events carry it so anything
//! from a superseded attempt is dropped.

use std::{future::Future, io, time::Instant};

use crossterm::event::{Event, EventStream};
use drumlights_app::{App, AppEvent, Driver, DriverEvent};
use futures::{SinkExt, StreamExt};
use ratatui::DefaultTerminal;
use thiserror::Error;
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

use crate::{
    input::{InputState, KeyInput},
    ui,
};

/// Terminal driver errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// Terminal I/O failed.
    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),

    /// No socket is open to send on.
    #[error("not connected to device")]
    NotConnected,
}

#[derive(Debug)]
enum SocketEvent {
    Opened,
    Frame(String),
    Closed,
}

#[derive(Debug)]
struct Tagged {
    generation: u64,
    event: SocketEvent,
}

/// Socket side of the driver: which attempt is current and where its
/// outbound frames go.
#[derive(Debug, Default)]
struct SocketLink {
    generation: u64,
    outbound: Option<mpsc::UnboundedSender<String>>,
}

impl SocketLink {
    /// Start a new attempt. Anything still tagged with an older generation
    /// is stale from here on.
    fn begin(&mut self) -> (u64, mpsc::UnboundedReceiver<String>) {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        self.generation += 1;
        self.outbound = Some(outbound_tx);
        (self.generation, outbound_rx)
    }

    fn route(&mut self, tagged: Tagged) -> Vec<DriverEvent> {
        if tagged.generation != self.generation {
            debug!(generation = tagged.generation, "dropping stale socket event");
            return vec![];
        }
        match tagged.event {
            SocketEvent::Opened => vec![DriverEvent::TransportOpened],
            SocketEvent::Frame(text) => vec![DriverEvent::Frame(text)],
            SocketEvent::Closed => {
                self.outbound = None;
                vec![DriverEvent::TransportClosed]
            },
        }
    }

    fn send(&self, text: String) -> Result<(), TerminalError> {
        let outbound = self.outbound.as_ref().ok_or(TerminalError::NotConnected)?;
        outbound.send(text).map_err(|_| TerminalError::NotConnected)
    }

    fn close(&mut self) {
        self.outbound = None;
    }
}

/// Driver for the real terminal and the real device.
pub struct TerminalDriver {
    terminal: DefaultTerminal,
    keys: EventStream,
    input: InputState,
    socket_tx: mpsc::UnboundedSender<Tagged>,
    socket_rx: mpsc::UnboundedReceiver<Tagged>,
    link: SocketLink,
    task: Option<JoinHandle<()>>,
}

impl TerminalDriver {
    /// Enter the alternate screen and start reading keys.
    ///
    /// Must be called inside a tokio runtime.
    pub fn new() -> Result<Self, TerminalError> {
        let terminal = ratatui::try_init()?;
        let (socket_tx, socket_rx) = mpsc::unbounded_channel();
        Ok(Self {
            terminal,
            keys: EventStream::new(),
            input: InputState::default(),
            socket_tx,
            socket_rx,
            link: SocketLink::default(),
            task: None,
        })
    }

    fn draw(&mut self, app: &App) -> Result<(), TerminalError> {
        let input = &self.input;
        self.terminal.draw(|frame| ui::render(frame, app, input))?;
        Ok(())
    }

    fn terminal_event(&mut self, app: &App, event: Event) -> Result<Vec<DriverEvent>, TerminalError> {
        match event {
            Event::Key(key) => match self.input.handle_key(key, app) {
                KeyInput::Event(event) => Ok(vec![DriverEvent::Input(event)]),
                KeyInput::Redraw => {
                    self.draw(app)?;
                    Ok(vec![])
                },
                KeyInput::Ignored => Ok(vec![]),
            },
            Event::Resize(..) => {
                self.draw(app)?;
                Ok(vec![])
            },
            _ => Ok(vec![]),
        }
    }
}

/// Socket task: open, then pump frames both ways until either side ends.
async fn run_socket(
    url: String,
    generation: u64,
    events: mpsc::UnboundedSender<Tagged>,
    mut outbound: mpsc::UnboundedReceiver<String>,
) {
    let emit = |event| {
        // receiver gone means the driver is shutting down
        let _ = events.send(Tagged { generation, event });
    };

    let stream = match connect_async(url.as_str()).await {
        Ok((stream, _response)) => stream,
        Err(err) => {
            warn!(%err, %url, "websocket connect failed");
            emit(SocketEvent::Closed);
            return;
        },
    };
    info!(%url, generation, "websocket open");
    emit(SocketEvent::Opened);

    let (mut writer, mut reader) = stream.split();
    loop {
        tokio::select! {
            frame = reader.next() => match frame {
                Some(Ok(Message::Text(text))) => emit(SocketEvent::Frame(text.as_str().to_owned())),
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {},
                Some(Err(err)) => {
                    warn!(%err, "websocket read error");
                    break;
                },
            },
            text = outbound.recv() => match text {
                Some(text) => {
                    if let Err(err) = writer.send(Message::Text(text.into())).await {
                        warn!(%err, "websocket write error");
                        break;
                    }
                },
                None => break,
            },
        }
    }

    info!(%url, generation, "websocket closed");
    emit(SocketEvent::Closed);
}

impl Driver for TerminalDriver {
    type Error = TerminalError;

    async fn poll_event(
        &mut self,
        app: &App,
        wake_at: Option<Instant>,
    ) -> Result<Vec<DriverEvent>, Self::Error> {
        let timer = async {
            match wake_at {
                Some(at) => tokio::time::sleep_until(tokio::time::Instant::from_std(at)).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            Some(tagged) = self.socket_rx.recv() => Ok(self.link.route(tagged)),
            key = self.keys.next() => match key {
                Some(Ok(event)) => self.terminal_event(app, event),
                Some(Err(err)) => Err(TerminalError::Io(err)),
                None => Ok(vec![DriverEvent::Input(AppEvent::Quit)]),
            },
            () = timer => Ok(vec![]),
        }
    }

    fn connect(&mut self, url: &str) -> impl Future<Output = Result<(), Self::Error>> + Send {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        let (generation, outbound) = self.link.begin();
        self.task = Some(tokio::spawn(run_socket(
            url.to_string(),
            generation,
            self.socket_tx.clone(),
            outbound,
        )));
        std::future::ready(Ok(()))
    }

    fn send_text(&mut self, text: String) -> impl Future<Output = Result<(), Self::Error>> + Send {
        std::future::ready(self.link.send(text))
    }

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        self.draw(app)
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.link.close();
        ratatui::restore();
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        ratatui::restore();
    }
}

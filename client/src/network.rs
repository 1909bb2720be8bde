use crate::input::{parse_command, Command, HELP};
use crate::rendering::render;
use futures::{SinkExt, StreamExt};
use log::{debug, info, warn};
use shared::{ClientMessage, Role, StateMessage};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use url::Url;

/// Appends the handshake parameters to the server's WebSocket URL
///
/// The name is only sent for players; it is URL-encoded here and decoded by
/// the server.
pub fn handshake_url(server: &str, role: Role, name: Option<&str>) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(server)?;
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("role", role.as_str());
        if let (Role::Player, Some(name)) = (role, name) {
            pairs.append_pair("name", name);
        }
    }
    Ok(url)
}

pub struct Client {
    url: Url,
    role: Role,
}

impl Client {
    pub fn new(server: &str, role: Role, name: Option<&str>) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Client {
            url: handshake_url(server, role, name)?,
            role,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    fn handle_state(&self, state: &StateMessage) {
        println!("\n{}", render(state, self.role));
    }

    /// Connects, then relays typed commands and prints state updates until
    /// the user quits or the server goes away
    pub async fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        info!("Connecting to {}...", self.url);
        let (socket, _) = connect_async(self.url.as_str()).await?;
        let (mut write, mut read) = socket.split();
        info!("Connected as {}", self.role);
        println!("{}", HELP);

        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            tokio::select! {
                frame = read.next() => {
                    match frame {
                        Some(Ok(Message::Text(text))) => match StateMessage::decode(text.as_bytes()) {
                            Ok(state) => self.handle_state(&state),
                            Err(e) => warn!("Ignoring malformed state: {}", e),
                        },
                        Some(Ok(Message::Close(_))) | None => {
                            info!("Server closed the connection");
                            break;
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => return Err(e.into()),
                    }
                },

                line = lines.next_line() => {
                    let Some(line) = line? else {
                        break;
                    };

                    match parse_command(&line) {
                        Some(Command::Send(action)) => {
                            let json = ClientMessage::new(action).encode()?;
                            write.send(Message::Text(json.into())).await?;
                        }
                        Some(Command::Help) => println!("{}", HELP),
                        Some(Command::Quit) => break,
                        None => println!("Unknown command. {}", HELP),
                    }
                },
            }
        }

        if let Err(e) = write.send(Message::Close(None)).await {
            debug!("Close frame not delivered: {}", e);
        }
        Ok(())
    }
}

//! The network host for the table service.
//!
//! Framing is deliberately simple: one JSON request per line in, one
//! JSON reply per line out, over plain TCP. Whatever speaks that (the
//! desktop grid client, `nc`, a test) can drive the whole engine. Each
//! accepted connection is handed to a fixed [`WorkerPool`], so slow
//! clients occupy a worker but never block the accept loop.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};

use log::{info, warn};

use crate::service::{Reply, Request, TableService};

mod pool;

pub use pool::WorkerPool;

const DEFAULT_BIND: &str = "127.0.0.1:5031";
const DEFAULT_WORKERS: usize = 4;

/// Listener settings, read from the environment so a deployment can be
/// tuned without a rebuild.
pub struct ServerConfig {
    pub bind: String,
    pub workers: usize,
}

impl ServerConfig {
    pub fn from_env() -> ServerConfig {
        //! Build the config from `SLATE_BIND` and `SLATE_WORKERS`,
        //! falling back to the defaults for anything unset or invalid.
        //! Call after the dotenv file has been loaded.

        let bind = std::env::var("SLATE_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());
        let workers = std::env::var("SLATE_WORKERS")
            .ok()
            .and_then(|raw| raw.parse::<usize>().ok())
            .filter(|&count| count > 0)
            .unwrap_or(DEFAULT_WORKERS);

        ServerConfig { bind, workers }
    }
}

pub struct Server {
    config: ServerConfig,
    service: TableService,
}

impl Server {
    pub fn new(config: ServerConfig, service: TableService) -> Server {
        Server { config, service }
    }

    pub fn run(&self) -> std::io::Result<()> {
        //! Bind the listener and serve until the process is killed.
        //!
        //! A failed accept is logged and skipped; only failing to bind
        //! at all is returned to the caller.

        let listener = TcpListener::bind(&self.config.bind)?;
        let pool = WorkerPool::new(self.config.workers);

        info!(
            "listening on {} with {} worker(s)",
            self.config.bind, self.config.workers
        );

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    let service = self.service.clone();
                    pool.execute(move || handle_connection(stream, service));
                }
                Err(error) => warn!("accept failed: {}", error),
            }
        }

        Ok(())
    }
}

pub fn handle_connection(stream: TcpStream, service: TableService) {
    //! Serve one client until it hangs up.
    //!
    //! A line that does not parse into a [`Request`] gets a BadRequest
    //! error reply and the connection stays up; only I/O failures end
    //! the loop early.

    let peer = match stream.peer_addr() {
        Ok(address) => address.to_string(),
        Err(_) => "unknown".to_string(),
    };

    info!("client connected: {}", peer);

    let reader = match stream.try_clone() {
        Ok(clone) => BufReader::new(clone),
        Err(error) => {
            warn!("could not split stream for {}: {}", peer, error);
            return;
        }
    };
    let mut writer = stream;

    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(error) => {
                warn!("read failed for {}: {}", peer, error);
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let reply = match serde_json::from_str::<Request>(&line) {
            Ok(request) => service.dispatch(request),
            Err(error) => {
                warn!("malformed request from {}: {}", peer, error);
                Reply::bad_request(format!("Malformed request: {}", error))
            }
        };

        let encoded = serde_json::to_string(&reply).unwrap();
        if let Err(error) = writeln!(writer, "{}", encoded) {
            warn!("write failed for {}: {}", peer, error);
            break;
        }
    }

    info!("client disconnected: {}", peer);
}

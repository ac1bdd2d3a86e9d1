use log::{error, info};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader,
};
use tokio::net::TcpStream;
use tokio::sync::Mutex;

use crate::client::{Client, ClientRegistry};
use crate::error::handlers::{error_to_reply_code, handle_error};
use crate::error::{ServerError, SessionError};
use crate::protocol::responses::{LOCAL_ERROR, READY, format_response};
use crate::protocol::{CommandStatus, handle_command, parse_command};
use crate::server::AppState;

/// One line read from the client, with at most `max_len` bytes buffered.
enum ReadLine {
    Closed,
    Line,
    TooLong(usize),
}

/// Reads up to and including the next `\n` into `buf`.
///
/// A line longer than `max_len` is dropped through its terminator without
/// being buffered.
async fn read_bounded_line<R>(
    reader: &mut R,
    buf: &mut Vec<u8>,
    max_len: usize,
) -> io::Result<ReadLine>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    let read = (&mut *reader)
        .take(max_len as u64 + 1)
        .read_until(b'\n', buf)
        .await?;
    if read == 0 {
        return Ok(ReadLine::Closed);
    }
    if buf.len() <= max_len {
        return Ok(ReadLine::Line);
    }

    let mut total = buf.len();
    if !buf.ends_with(b"\n") {
        loop {
            let chunk = reader.fill_buf().await?;
            if chunk.is_empty() {
                break;
            }
            let (used, done) = match chunk.iter().position(|&b| b == b'\n') {
                Some(pos) => (pos + 1, true),
                None => (chunk.len(), false),
            };
            reader.consume(used);
            total += used;
            if done {
                break;
            }
        }
    }
    buf.clear();
    Ok(ReadLine::TooLong(total))
}

/// Writes the reply for a session-level error and logs it.
async fn reject_line<W>(writer: &mut W, err: SessionError, text: &str) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let err = ServerError::from(err);
    handle_error(&err);
    writer
        .write_all(format_response(error_to_reply_code(&err), text).as_bytes())
        .await
}

/// Handles one client session.
///
/// - Uses BufReader to read command lines from the client, never buffering
///   more than `max_command_length` bytes of one line.
/// - Dispatches commands with `handle_command` on the blocking pool.
/// - Mirrors login state into the shared `registry`.
pub async fn handle_client(
    stream: TcpStream,
    client_addr: SocketAddr,
    registry: Arc<Mutex<ClientRegistry>>,
    state: Arc<AppState>,
) -> Result<(), ServerError> {
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);
    let mut line = Vec::new();
    let mut client = Client::new(client_addr);

    write_half
        .write_all(format_response(READY, "Unified Intelligence Platform ready").as_bytes())
        .await?;
    write_half.flush().await?;

    let max_command_length = state.limits.max_command_length;

    loop {
        match read_bounded_line(&mut reader, &mut line, max_command_length).await? {
            ReadLine::Closed => {
                info!("Connection closed by client {}", client_addr);
                break;
            }
            ReadLine::TooLong(len) => {
                reject_line(&mut write_half, SessionError::CommandTooLong(len), "Command too long")
                    .await?;
                continue;
            }
            ReadLine::Line => {}
        }

        let Ok(text) = std::str::from_utf8(&line) else {
            reject_line(&mut write_half, SessionError::InvalidEncoding, "Command must be UTF-8")
                .await?;
            continue;
        };

        let command = parse_command(text);
        info!("Received from {}: {:?}", client_addr, command);

        let task_state = Arc::clone(&state);
        let outcome = tokio::task::spawn_blocking(move || {
            let result = handle_command(&mut client, &command, &task_state);
            (client, result)
        })
        .await;

        let result = match outcome {
            Ok((returned, result)) => {
                client = returned;
                result
            }
            Err(e) => {
                error!("Command task for {} failed: {}", client_addr, e);
                write_half
                    .write_all(format_response(LOCAL_ERROR, "Requested action aborted").as_bytes())
                    .await?;
                return Err(SessionError::TaskFailed(e.to_string()).into());
            }
        };

        registry
            .lock()
            .await
            .set_username(&client_addr, client.username().cloned());

        if let Some(msg) = &result.message {
            write_half.write_all(msg.as_bytes()).await?;
        }

        if result.status == CommandStatus::CloseConnection {
            info!("Client {} requested to quit", client_addr);
            break;
        }
    }

    Ok(())
}

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::http::parser::{ParseError, parse_http_request};
use crate::http::request::Request;

/// Size of each read from the socket.
pub const READ_CHUNK_SIZE: usize = 1024;

/// What a connection produced before it stopped sending.
#[derive(Debug)]
pub enum ReadOutcome {
    Request(Request),
    Malformed(ParseError),
    /// The peer closed the stream without sending anything.
    Empty,
}

/// Accumulates data until the stream ends or a read comes back short.
///
/// A read that fills the whole chunk is taken to mean more data is pending,
/// so a request that is an exact multiple of [`READ_CHUNK_SIZE`] waits for
/// the next read (or end-of-stream).
pub async fn read_to_buffer<R>(stream: &mut R) -> std::io::Result<BytesMut>
where
    R: AsyncRead + Unpin,
{
    let mut buffer = BytesMut::with_capacity(4096);
    let mut chunk = [0u8; READ_CHUNK_SIZE];

    loop {
        let n = stream.read(&mut chunk).await?;

        if n == 0 {
            tracing::debug!(bytes = buffer.len(), "Client closed connection");
            break;
        }

        buffer.extend_from_slice(&chunk[..n]);

        if n < READ_CHUNK_SIZE {
            break;
        }
    }

    Ok(buffer)
}

/// Reads everything the peer sent and parses it as one request.
pub async fn read_request<R>(stream: &mut R) -> std::io::Result<ReadOutcome>
where
    R: AsyncRead + Unpin,
{
    let buffer = read_to_buffer(stream).await?;

    if buffer.is_empty() {
        return Ok(ReadOutcome::Empty);
    }

    Ok(match parse_http_request(&buffer) {
        Ok(request) => ReadOutcome::Request(request),
        Err(e) => ReadOutcome::Malformed(e),
    })
}

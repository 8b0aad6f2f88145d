use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::parser::HTTP_VERSION;
use crate::http::response::{
    CONTENT_LENGTH, CONTENT_TYPE, MIME_TEXT, Response, has_header, remove_header,
};

/// Formats the current time as an IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`.
pub fn http_date() -> String {
    chrono::Utc::now()
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

/// Renders a response onto the wire format.
///
/// `Content-Length` and `Date` are always computed here and replace anything
/// a handler set under any casing. `Content-Type` defaults to plain text when
/// no header of that name exists, whatever its case.
pub fn serialize_response(resp: &Response) -> Vec<u8> {
    let status = resp.status_or_default();

    let mut headers = resp.headers.clone();
    if !has_header(&headers, CONTENT_TYPE) {
        headers.insert(CONTENT_TYPE.to_string(), MIME_TEXT.to_string());
    }
    remove_header(&mut headers, CONTENT_LENGTH);
    remove_header(&mut headers, "Date");
    headers.insert(CONTENT_LENGTH.to_string(), resp.body.len().to_string());
    headers.insert("Date".to_string(), http_date());

    let mut buf = Vec::with_capacity(128 + resp.body.len());

    // Status line
    let status_line = format!(
        "{} {} {}\r\n",
        HTTP_VERSION,
        status.as_u16(),
        status.reason_phrase()
    );
    buf.extend_from_slice(status_line.as_bytes());

    // Headers
    for (k, v) in &headers {
        buf.extend_from_slice(k.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(v.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }

    // Header/body separator
    buf.extend_from_slice(b"\r\n");

    // Body
    buf.extend_from_slice(&resp.body);

    buf
}

pub struct ResponseWriter {
    buffer: Vec<u8>,
    written: usize,
}

impl ResponseWriter {
    pub fn new(response: &Response) -> Self {
        Self {
            buffer: serialize_response(response),
            written: 0,
        }
    }

    /// The serialized bytes, including any part already written.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub async fn write_to_stream<W>(&mut self, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        while self.written < self.buffer.len() {
            let n = stream.write(&self.buffer[self.written..]).await?;

            if n == 0 {
                return Err(anyhow::anyhow!("connection closed while writing"));
            }

            self.written += n;
        }

        stream.flush().await?;

        Ok(())
    }
}

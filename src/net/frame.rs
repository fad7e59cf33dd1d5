//! Multipart message framing.
//!
//! # Wire Format
//! ```text
//! u32 BE frame count
//! repeated: u32 BE frame length, frame bytes
//! ```
//!
//! A client request is `[empty, payload]`; inside the service the broker
//! sees `[client, empty, payload]`.

use bytes::{BufMut, Bytes, BytesMut};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Upper bound on frames in one message.
pub const MAX_FRAMES: usize = 16;

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("message has {count} frames, at most {MAX_FRAMES} allowed")]
    TooManyFrames { count: usize },

    #[error("frame of {len} bytes exceeds the {max} byte limit")]
    FrameTooLarge { len: usize, max: usize },

    #[error("malformed envelope: {0}")]
    Malformed(&'static str),
}

impl FrameError {
    /// Whether the stream can still be read after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, FrameError::Malformed(_))
    }
}

/// An ordered list of frames.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Multipart(Vec<Bytes>);

impl Multipart {
    pub fn new(frames: Vec<Bytes>) -> Self {
        Self(frames)
    }

    pub fn frames(&self) -> &[Bytes] {
        &self.0
    }

    pub fn into_frames(self) -> Vec<Bytes> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Split off the first frame.
    pub fn pop_front(mut self) -> Option<(Bytes, Multipart)> {
        if self.0.is_empty() {
            return None;
        }
        let head = self.0.remove(0);
        Some((head, self))
    }

    /// Prefix the message with `frame`.
    pub fn push_front(mut self, frame: Bytes) -> Self {
        self.0.insert(0, frame);
        self
    }
}

impl From<Vec<Bytes>> for Multipart {
    fn from(frames: Vec<Bytes>) -> Self {
        Self(frames)
    }
}

/// A request or reply addressed to a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub client: Bytes,
    pub payload: Bytes,
}

impl Envelope {
    /// Parse `[client, empty, payload]`.
    pub fn parse(message: Multipart) -> Result<Self, FrameError> {
        let mut frames = message.into_frames().into_iter();
        match (frames.next(), frames.next(), frames.next(), frames.next()) {
            (Some(client), Some(delimiter), Some(payload), None) => {
                if !delimiter.is_empty() {
                    return Err(FrameError::Malformed("delimiter frame is not empty"));
                }
                if client.is_empty() {
                    return Err(FrameError::Malformed("empty client address"));
                }
                Ok(Self { client, payload })
            }
            _ => Err(FrameError::Malformed("expected [client, empty, payload]")),
        }
    }

    pub fn into_multipart(self) -> Multipart {
        Multipart::new(vec![self.client, Bytes::new(), self.payload])
    }
}

/// Payload of a client-side message `[empty, payload]`.
pub fn parse_client_message(message: Multipart) -> Result<Bytes, FrameError> {
    let mut frames = message.into_frames().into_iter();
    match (frames.next(), frames.next(), frames.next()) {
        (Some(delimiter), Some(payload), None) if delimiter.is_empty() => Ok(payload),
        _ => Err(FrameError::Malformed("expected [empty, payload]")),
    }
}

/// Client-side message carrying `payload`.
pub fn client_message(payload: Bytes) -> Multipart {
    Multipart::new(vec![Bytes::new(), payload])
}

/// Read one message. `Ok(None)` when the peer closed between messages.
pub async fn read_message<R>(reader: &mut R, max_frame_bytes: usize) -> Result<Option<Multipart>, FrameError>
where
    R: AsyncRead + Unpin,
{
    let count = match reader.read_u32().await {
        Ok(count) => count as usize,
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    if count > MAX_FRAMES {
        return Err(FrameError::TooManyFrames { count });
    }

    let mut frames = Vec::with_capacity(count);
    for _ in 0..count {
        let len = reader.read_u32().await? as usize;
        if len > max_frame_bytes {
            return Err(FrameError::FrameTooLarge {
                len,
                max: max_frame_bytes,
            });
        }
        let mut frame = vec![0u8; len];
        reader.read_exact(&mut frame).await?;
        frames.push(Bytes::from(frame));
    }

    Ok(Some(Multipart::new(frames)))
}

/// Write one message and flush it.
pub async fn write_message<W>(writer: &mut W, message: &Multipart) -> Result<(), FrameError>
where
    W: AsyncWrite + Unpin,
{
    if message.len() > MAX_FRAMES {
        return Err(FrameError::TooManyFrames { count: message.len() });
    }
    let size = 4 + message.frames().iter().map(|f| 4 + f.len()).sum::<usize>();
    let mut buf = BytesMut::with_capacity(size);
    buf.put_u32(message.len() as u32);
    for frame in message.frames() {
        buf.put_u32(frame.len() as u32);
        buf.put_slice(frame);
    }
    writer.write_all(&buf).await?;
    writer.flush().await?;
    Ok(())
}

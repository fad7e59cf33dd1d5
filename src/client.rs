//! Async client for the routing service.

use bytes::Bytes;
use prost::Message;
use thiserror::Error;
use tokio::net::{TcpStream, ToSocketAddrs};

use crate::net::frame::{self, FrameError, Multipart};
use crate::proto::{Request, Response};

const DEFAULT_MAX_FRAME_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("connection failed: {0}")]
    Connect(#[from] std::io::Error),

    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error("invalid response: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("connection closed by the service")]
    Closed,
}

/// One connection to the service. Requests on a connection are answered
/// in the order they were sent.
pub struct RouterClient {
    stream: TcpStream,
    max_frame_bytes: usize,
}

impl RouterClient {
    pub async fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self, ClientError> {
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;
        Ok(Self {
            stream,
            max_frame_bytes: DEFAULT_MAX_FRAME_BYTES,
        })
    }

    pub async fn send(&mut self, request: &Request) -> Result<Response, ClientError> {
        let payload = self.send_raw(Bytes::from(request.encode_to_vec())).await?;
        Ok(Response::decode(payload)?)
    }

    /// Send an already encoded payload and wait for the reply payload.
    pub async fn send_raw(&mut self, payload: Bytes) -> Result<Bytes, ClientError> {
        self.send_frames(&frame::client_message(payload)).await?;
        self.recv().await
    }

    /// Write a message as is, without waiting for a reply.
    pub async fn send_frames(&mut self, message: &Multipart) -> Result<(), ClientError> {
        frame::write_message(&mut self.stream, message).await?;
        Ok(())
    }

    /// Wait for the next reply payload.
    pub async fn recv(&mut self) -> Result<Bytes, ClientError> {
        let message = frame::read_message(&mut self.stream, self.max_frame_bytes)
            .await?
            .ok_or(ClientError::Closed)?;
        Ok(frame::parse_client_message(message)?)
    }
}

//! Worker loop.

use bytes::Bytes;
use tokio::sync::mpsc;

use crate::broker::{ready_message, WorkerId};
use crate::net::frame::{Envelope, Multipart};
use crate::observability;
use crate::worker::handler::Handler;

/// Serve requests from `inbox` until the broker drops it.
///
/// Announces readiness first; every reply doubles as the next readiness
/// signal. Must run on a dedicated thread: it blocks on the inbox and on
/// the engine.
pub fn run_worker(
    id: WorkerId,
    mut handler: Handler,
    mut inbox: mpsc::Receiver<Multipart>,
    outbox: mpsc::UnboundedSender<Multipart>,
) {
    if outbox.send(ready_message(&id)).is_err() {
        tracing::warn!(worker = %id, "Broker gone before the worker started");
        return;
    }
    tracing::info!(worker = %id, "Worker ready");

    let worker_name = id.to_string();
    while let Some(message) = inbox.blocking_recv() {
        let envelope = match Envelope::parse(message) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!(worker = %id, error = %e, "Discarding malformed request");
                if outbox.send(ready_message(&id)).is_err() {
                    break;
                }
                continue;
            }
        };

        let span = observability::tracing::request_span(&worker_name);
        let reply = span.in_scope(|| {
            let payload = handler.handle_payload(&envelope.payload);
            Envelope {
                client: envelope.client,
                payload: Bytes::from(payload),
            }
        });

        if outbox.send(reply.into_multipart().push_front(id.to_frame())).is_err() {
            break;
        }
    }

    tracing::info!(worker = %id, "Worker stopped");
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use prost::Message;

    use super::*;
    use crate::broker::READY;
    use crate::config::{CacheConfig, ElevationConfig, EngineConfig, RoutingConfig};
    use crate::context::RoutingContext;
    use crate::engine::CrowFlyEngine;
    use crate::observability::Metrics;
    use crate::projection::Projector;
    use crate::proto::{ErrorId, Response};

    fn handler() -> Handler {
        let engine = Arc::new(CrowFlyEngine::new(EngineConfig::default(), RoutingConfig::default()));
        let projector = Arc::new(Projector::new(engine.clone(), &CacheConfig::default()));
        let ctx = RoutingContext::new(
            engine,
            projector,
            Arc::new(Metrics::new()),
            RoutingConfig::default(),
            ElevationConfig::default(),
        );
        Handler::new(ctx, None)
    }

    #[test]
    fn worker_announces_itself_and_replies_to_the_sender() {
        let (inbox_tx, inbox_rx) = mpsc::channel(1);
        let (outbox_tx, mut outbox_rx) = mpsc::unbounded_channel();
        let id = WorkerId::from("worker-test");
        let worker = {
            let id = id.clone();
            thread::spawn(move || run_worker(id, handler(), inbox_rx, outbox_tx))
        };

        let ready = outbox_rx.blocking_recv().unwrap();
        assert_eq!(ready.frames(), &[id.to_frame(), Bytes::from_static(READY)]);

        let request = Envelope {
            client: Bytes::from_static(b"client-7"),
            payload: Bytes::from_static(&[0xff, 0x01]),
        };
        inbox_tx.blocking_send(request.into_multipart()).unwrap();

        let (worker_frame, reply) = outbox_rx.blocking_recv().unwrap().pop_front().unwrap();
        assert_eq!(worker_frame, id.to_frame());
        let reply = Envelope::parse(reply).unwrap();
        assert_eq!(reply.client, Bytes::from_static(b"client-7"));
        let response = Response::decode(reply.payload).unwrap();
        assert_eq!(response.error.unwrap().id(), ErrorId::InvalidProtobufRequest);

        drop(inbox_tx);
        worker.join().unwrap();
    }

    #[test]
    fn malformed_request_returns_the_worker_to_ready() {
        let (inbox_tx, inbox_rx) = mpsc::channel(1);
        let (outbox_tx, mut outbox_rx) = mpsc::unbounded_channel();
        let id = WorkerId::from("worker-test");
        let worker = {
            let id = id.clone();
            thread::spawn(move || run_worker(id, handler(), inbox_rx, outbox_tx))
        };
        outbox_rx.blocking_recv().unwrap();

        inbox_tx
            .blocking_send(Multipart::new(vec![Bytes::from_static(b"garbage")]))
            .unwrap();
        let again = outbox_rx.blocking_recv().unwrap();
        assert_eq!(again.frames()[1], Bytes::from_static(READY));

        drop(inbox_tx);
        worker.join().unwrap();
    }
}

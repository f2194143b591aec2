//! Worker loop: pulls descriptors, drives the transport, routes delivery.

use std::sync::{Arc, Weak};

use crossbeam_channel::Receiver;
use http::Method;

use crate::dispatch::queue::RequestQueue;
use crate::error::{self, Error};
use crate::http::request::{Payload, Request, RequestKind};
use crate::http::{body, headers, response, url};
use crate::transport::PreparedCall;

/// One ticket per submission: each wakeup pops at most one entry, so the
/// ready set drains exactly as fast as it fills.
pub(crate) fn run(queue: &Weak<RequestQueue>, tickets: &Receiver<()>) {
    while tickets.recv().is_ok() {
        let Some(queue) = queue.upgrade() else {
            break;
        };
        let Some(entry) = queue.pop_ready() else {
            continue;
        };
        execute(&queue, &entry.request);
    }
}

/// Drives one descriptor to delivery. A descriptor cancelled before this
/// point never touches the transport.
fn execute(queue: &Arc<RequestQueue>, request: &Arc<Request>) {
    if request.is_cancelled() {
        queue.stats().record_cancelled();
        request.deliver_error(error::cancelled());
        request.finish();
        return;
    }

    match perform(queue, request) {
        Ok(Some(payload)) => {
            if request.is_cancelled() {
                queue.stats().record_cancelled();
            } else {
                queue.stats().record_completed();
            }
            request.deliver_payload(payload);
        }
        Ok(None) => {
            // Raw, prefetch and pre-parsed kinds have nothing to route
            // through the callback; the caller owns further processing.
            queue.stats().record_completed();
            request.claim_delivery();
        }
        Err(error) => {
            queue.stats().record_failed();
            request.deliver_error(error);
        }
    }
    request.finish();
}

fn perform(queue: &Arc<RequestQueue>, request: &Arc<Request>) -> Result<Option<Payload>, Error> {
    let call = prepare(queue, request)?;
    let transport = request
        .transport
        .clone()
        .unwrap_or_else(|| Arc::clone(&queue.transport));
    let raw = transport.perform(&call).map_err(Error::from_transport)?;
    response::interpret(&raw, request.response_kind())
}

/// Resolves the URL template, merges headers and picks the body variant.
fn prepare(queue: &Arc<RequestQueue>, request: &Request) -> Result<PreparedCall, Error> {
    let url = url::resolve(&request.url, &request.path_params, &request.query_params)?;
    let agent = request
        .user_agent
        .as_deref()
        .or(queue.config.user_agent.as_deref());
    let headers = headers::to_header_map(&request.headers, agent);

    let body = match request.kind {
        RequestKind::Multipart => Some(body::resolve_multipart(request)),
        RequestKind::Simple => {
            if request.method == Method::GET
                || request.method == Method::HEAD
                || request.method == Method::OPTIONS
            {
                None
            } else {
                Some(body::resolve_body(request))
            }
        }
    };

    Ok(PreparedCall {
        method: request.method.clone(),
        url,
        headers,
        body,
        cache_directive: request.cache_directive.clone(),
        progress: request.progress.clone(),
    })
}

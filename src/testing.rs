use core::time::Duration;

use heapless::{Deque, LinearMap, Vec};

use crate::frame::MAX_FRAME_LEN;
use crate::request::{Request, MAX_CONTROL_LEN};
use crate::transport::{ErrorKind, Transport};

#[derive(Debug)]
enum Reply {
    Data { bytes: [u8; MAX_CONTROL_LEN], len: usize },
    Fail(ErrorKind),
}

type BulkReply = Result<Vec<u8, MAX_FRAME_LEN>, ErrorKind>;

/// Canned control replies keyed by (request, wValue, wIndex), plus a queue of bulk reads.
pub struct FakeTransport<const N: usize> {
    replies: LinearMap<(u8, u16, u16), Reply, N>,
    bulk: Deque<BulkReply, 4>,
    issued: Vec<(u8, u16, u16), 128>,
    bulk_reads: usize,
    fail_next: Option<ErrorKind>,
}

impl<const N: usize> FakeTransport<N> {
    pub fn new() -> Self {
        FakeTransport {
            replies: LinearMap::new(),
            bulk: Deque::new(),
            issued: Vec::new(),
            bulk_reads: 0,
            fail_next: None,
        }
    }

    pub fn with_response<R: Request>(&mut self, request: &R, data: &[u8]) {
        let mut bytes = [0u8; MAX_CONTROL_LEN];
        bytes[..data.len()].copy_from_slice(data);
        self.replies.insert(key(request), Reply::Data { bytes, len: data.len() }).unwrap();
    }

    pub fn with_failure<R: Request>(&mut self, request: &R, kind: ErrorKind) {
        self.replies.insert(key(request), Reply::Fail(kind)).unwrap();
    }

    /// Fails the next control request with `kind`, whatever it is. Later requests get their
    /// canned replies again.
    pub fn fail_next(&mut self, kind: ErrorKind) {
        self.fail_next = Some(kind);
    }

    pub fn with_bulk(&mut self, data: &[u8]) {
        self.bulk.push_back(Ok(Vec::from_slice(data).unwrap())).unwrap();
    }

    pub fn with_bulk_failure(&mut self, kind: ErrorKind) {
        self.bulk.push_back(Err(kind)).unwrap();
    }

    /// How many times `request` was issued.
    pub fn count<R: Request>(&self, request: &R) -> usize {
        let key = key(request);
        self.issued.iter().filter(|&&issued| issued == key).count()
    }

    pub fn bulk_reads(&self) -> usize {
        self.bulk_reads
    }
}

fn key<R: Request>(request: &R) -> (u8, u16, u16) {
    (R::CODE, request.value(), request.index())
}

impl<const N: usize> Transport for FakeTransport<N> {
    type Error = ErrorKind;

    fn control_in(&mut self, request: u8, value: u16, index: u16, data: &mut [u8]) -> Result<usize, Self::Error> {
        self.issued.push((request, value, index)).unwrap();

        if let Some(kind) = self.fail_next.take() {
            return Err(kind);
        }

        match self.replies.get(&(request, value, index)) {
            Some(Reply::Data { bytes, len }) => {
                let n = (*len).min(data.len());
                data[..n].copy_from_slice(&bytes[..n]);
                Ok(n)
            }
            Some(Reply::Fail(kind)) => Err(*kind),
            None => panic!("No mocked reply for request 0x{:x} value {} index {}", request, value, index),
        }
    }

    fn bulk_in(&mut self, _endpoint: u8, data: &mut [u8], _timeout: Duration) -> Result<usize, Self::Error> {
        self.bulk_reads += 1;

        match self.bulk.pop_front() {
            Some(Ok(bytes)) => {
                let n = bytes.len().min(data.len());
                data[..n].copy_from_slice(&bytes[..n]);
                Ok(n)
            }
            Some(Err(kind)) => Err(kind),
            None => Err(ErrorKind::Timeout),
        }
    }
}

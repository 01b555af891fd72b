//! Library handle: the context every operation runs under
//!
//! A [`Handle`] owns a connected [`Backend`], an optional execution [`Queue`]
//! and the pointer-mode policy used to read alpha/beta scalars. It is created
//! with [`Handle::create`] and released with [`Handle::destroy`], which
//! consumes it, so a destroyed handle cannot be used again.

use log::debug;

use crate::error::SparseResult;
use crate::kernels::{Backend, DeviceScalar, Scalar};
use crate::matrix::config::HybAutoPolicy;

/// Where scalar arguments such as alpha and beta live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerMode {
    /// Scalars are host values
    Host,
    /// Scalars are backend-resident
    Device,
}

impl TryFrom<i32> for PointerMode {
    type Error = crate::error::SparseError;

    fn try_from(code: i32) -> SparseResult<Self> {
        match code {
            0 => Ok(PointerMode::Host),
            1 => Ok(PointerMode::Device),
            other => Err(crate::error::SparseError::invalid(
                "pointer_mode",
                format!("{} is not a valid code", other),
            )),
        }
    }
}

/// Token identifying an execution queue on a backend
///
/// Queues are created by the backend that runs them, through
/// [`Handle::create_queue`]. Work issued on one queue completes in issue order. Ordering between
/// different queues is up to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Queue {
    id: u64,
}

impl Queue {
    /// The queue a backend uses when none is bound to the handle
    pub const DEFAULT: Queue = Queue { id: 0 };

    /// Wraps a queue id minted by a backend
    ///
    /// Backends call this from [`Backend::create_queue`]; id 0 is reserved
    /// for [`Queue::DEFAULT`].
    pub fn from_backend(id: u64) -> Self {
        Self { id }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_default(&self) -> bool {
        self.id == 0
    }
}

/// Library context bound to one backend
pub struct Handle<B: Backend> {
    backend: B,
    queue: Option<Queue>,
    pointer_mode: PointerMode,
    hyb_policy: HybAutoPolicy,
}

impl<B: Backend> Handle<B> {
    /// Connects a backend and creates a handle in host pointer mode
    ///
    /// # Errors
    ///
    /// Whatever the backend reports when its context cannot be established,
    /// `AllocFailed` for the host backend.
    pub fn create(config: B::Config) -> SparseResult<Self> {
        let backend = B::connect(config)?;
        debug!("created handle on backend '{}'", backend.name());

        Ok(Self {
            backend,
            queue: None,
            pointer_mode: PointerMode::Host,
            hyb_policy: HybAutoPolicy::default(),
        })
    }

    /// Releases the handle and its backend context
    ///
    /// Work still outstanding on the bound queue must be finished by the
    /// caller beforehand.
    pub fn destroy(self) -> SparseResult<()> {
        debug!("destroying handle on backend '{}'", self.backend.name());
        self.backend.disconnect()
    }

    /// Library version as `major * 100000 + minor * 100 + patch`
    pub fn version(&self) -> i32 {
        let part = |s: &str| s.parse::<i32>().unwrap_or(0);
        part(env!("CARGO_PKG_VERSION_MAJOR")) * 100_000
            + part(env!("CARGO_PKG_VERSION_MINOR")) * 100
            + part(env!("CARGO_PKG_VERSION_PATCH"))
    }

    /// Creates a new execution queue on this handle's backend
    ///
    /// The queue is not bound; pass it to [`Handle::set_queue`] to use it.
    pub fn create_queue(&self) -> SparseResult<Queue> {
        let queue = self.backend.create_queue()?;
        debug!("backend '{}' created queue {}", self.backend.name(), queue.id());
        Ok(queue)
    }

    /// Binds an execution queue; subsequent operations are issued on it
    pub fn set_queue(&mut self, queue: Queue) {
        debug!("binding queue {} to handle", queue.id());
        self.queue = Some(queue);
    }

    /// The explicitly bound queue, if any
    pub fn queue(&self) -> Option<Queue> {
        self.queue
    }

    /// The queue operations are issued on: the bound one or the backend default
    pub fn active_queue(&self) -> Queue {
        self.queue.unwrap_or_else(|| self.backend.default_queue())
    }

    pub fn set_pointer_mode(&mut self, mode: PointerMode) {
        self.pointer_mode = mode;
    }

    pub fn pointer_mode(&self) -> PointerMode {
        self.pointer_mode
    }

    /// Weights used by the automatic HYB partition
    pub fn hyb_auto_policy(&self) -> HybAutoPolicy {
        self.hyb_policy
    }

    pub fn set_hyb_auto_policy(&mut self, policy: HybAutoPolicy) {
        self.hyb_policy = policy;
    }

    /// Places a scalar in backend memory for use in device pointer mode
    pub fn upload_scalar<T: Scalar>(&self, value: T) -> SparseResult<DeviceScalar<T>> {
        self.backend.upload_scalar(self.active_queue(), value)
    }

    /// Blocks until all work issued on the active queue has finished
    pub fn synchronize(&self) -> SparseResult<()> {
        self.backend.synchronize(self.active_queue())
    }

    /// The connected backend
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

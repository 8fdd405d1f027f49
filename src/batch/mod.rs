//! The batch module decodes many archive members at once, and repacks decoded files
//! back into members.
//!
//! Every member is an independent stream, so each file gets its own job with its own
//! decoder and buffers. Jobs run on a worker pool sized to the machine, and a counting
//! admission pool keeps the submitter from queueing more work than there are workers.
//! That caps peak memory, since a decoded member can be several times its compressed size.
//!
//! Failures stay local to their job, panics included: they are logged and reported, and
//! the rest carry on.
//!

pub mod admission;
pub mod driver;

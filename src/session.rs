//! Fragment-by-fragment decoding of one device session.

use tracing::debug;

use crate::config::Config;
use crate::context::DecodeContext;
use crate::error::{Progress, WedError};
use crate::stream::decompress;

/// Feeds arbitrary fragments through [`decompress`], carrying partial
/// packets over to the next fragment.
#[derive(Debug, Clone)]
pub struct StreamDecoder {
    ctx: DecodeContext,
    pending: Vec<u8>,
    scratch: Vec<u8>,
}

impl StreamDecoder {
    pub fn new(config: &Config) -> Result<Self, WedError> {
        Self::with_context(config, DecodeContext::new())
    }

    /// Resume a session from a previously saved context.
    ///
    /// Fails with [`WedError::Config`] when the scratch buffer could not hold
    /// a full compressed run, since such a session would never make progress.
    pub fn with_context(config: &Config, ctx: DecodeContext) -> Result<Self, WedError> {
        config.validate()?;
        Ok(Self {
            ctx,
            pending: Vec::new(),
            scratch: vec![0; config.output_capacity],
        })
    }

    pub fn context(&self) -> &DecodeContext {
        &self.ctx
    }

    /// Input bytes received but not yet decoded.
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    /// Decode as much of `fragment` (plus any carried bytes) as possible and
    /// append the expansion to `out`. Returns the number of bytes appended.
    ///
    /// On a framing error the bytes decoded before it are still appended and
    /// the offending packet stays pending.
    pub fn feed(&mut self, fragment: &[u8], out: &mut Vec<u8>) -> Result<usize, WedError> {
        self.pending.extend_from_slice(fragment);
        let start = out.len();
        loop {
            let result = decompress(&self.pending, &mut self.scratch, &mut self.ctx);
            let progress = match &result {
                Ok(p) => *p,
                Err(e) => e.progress(),
            };
            self.commit(progress, out);
            if let Err(e) = result {
                return Err(e);
            }
            if progress.consumed == 0 {
                break;
            }
        }
        debug!(
            appended = out.len() - start,
            pending = self.pending.len(),
            "fragment decoded"
        );
        Ok(out.len() - start)
    }

    fn commit(&mut self, progress: Progress, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.scratch[..progress.produced]);
        self.pending.drain(..progress.consumed);
    }

    /// Drop everything pending, e.g. after a framing error. Returns the
    /// number of bytes dropped.
    pub fn discard_pending(&mut self) -> usize {
        let n = self.pending.len();
        self.pending.clear();
        n
    }

    /// End the session, returning its context and any bytes that never
    /// formed a whole packet.
    pub fn finish(self) -> (DecodeContext, Vec<u8>) {
        (self.ctx, self.pending)
    }
}

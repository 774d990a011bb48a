use async_trait::async_trait;

use crate::render::Frame;
use crate::Result;

/// An encoding backend fed one frame at a time
///
/// Each call returns the chunks the backend produced since the previous call
/// (possibly none). Chunks must be yielded in output order.
#[async_trait]
pub trait FrameEncoder: Send {
    /// Mime type of the finished container
    fn mime_type(&self) -> &str;

    /// File extension of the finished container, without the dot
    fn extension(&self) -> &str;

    /// Prepare for frames of `width` x `height` at `fps`
    async fn begin(&mut self, width: u32, height: u32, fps: u32) -> Result<()>;

    /// Accept one frame
    async fn encode_frame(&mut self, frame: &Frame) -> Result<Vec<Vec<u8>>>;

    /// Flush and close; returns every chunk still pending
    async fn finish(&mut self) -> Result<Vec<Vec<u8>>>;

    /// Tear down without producing output
    async fn abort(&mut self);
}

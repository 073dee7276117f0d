//! Render time measurement.
//!
//! With `TIMESTAMP_QUERY` the render pass writes GPU timestamps at its start
//! and end. Without it the timer falls back to CPU wall time from
//! [`RenderTimer::begin`] until the submitted work has finished. Either way
//! the readback waits for the GPU, which synchronises every frame.

use std::time::Duration;

use instant::Instant;

const QUERY_COUNT: u32 = 2;
const RESOLVE_SIZE: u64 = QUERY_COUNT as u64 * wgpu::QUERY_SIZE as u64;
const POLL_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug)]
struct GpuTimestamps {
    query_set: wgpu::QuerySet,
    resolve_buffer: wgpu::Buffer,
    readback_buffer: wgpu::Buffer,
    /// Nanoseconds per timestamp tick.
    period: f32,
}

#[derive(Debug)]
pub struct RenderTimer {
    gpu: Option<GpuTimestamps>,
    started: Option<Instant>,
}

impl RenderTimer {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let gpu = device
            .features()
            .contains(wgpu::Features::TIMESTAMP_QUERY)
            .then(|| GpuTimestamps {
                query_set: device.create_query_set(&wgpu::QuerySetDescriptor {
                    label: Some("Render Timer Queries"),
                    ty: wgpu::QueryType::Timestamp,
                    count: QUERY_COUNT,
                }),
                resolve_buffer: device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some("Render Timer Resolve Buffer"),
                    size: RESOLVE_SIZE,
                    usage: wgpu::BufferUsages::QUERY_RESOLVE | wgpu::BufferUsages::COPY_SRC,
                    mapped_at_creation: false,
                }),
                readback_buffer: device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some("Render Timer Readback Buffer"),
                    size: RESOLVE_SIZE,
                    usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                }),
                period: queue.get_timestamp_period(),
            });
        log::info!(
            "Render timer uses {}",
            if gpu.is_some() { "GPU timestamps" } else { "CPU wall time" }
        );
        Self { gpu, started: None }
    }

    pub fn uses_gpu_timestamps(&self) -> bool {
        self.gpu.is_some()
    }

    /// Marks the start of a frame for the CPU fallback.
    pub fn begin(&mut self) {
        self.started = Some(Instant::now());
    }

    /// Timestamp writes for the render pass being measured.
    pub fn timestamp_writes(&self) -> Option<wgpu::RenderPassTimestampWrites<'_>> {
        self.gpu.as_ref().map(|gpu| wgpu::RenderPassTimestampWrites {
            query_set: &gpu.query_set,
            beginning_of_pass_write_index: Some(0),
            end_of_pass_write_index: Some(1),
        })
    }

    /// Copies the timestamps out of the query set. Call after the pass ends
    /// and before the encoder is finished.
    pub fn resolve(&self, encoder: &mut wgpu::CommandEncoder) {
        if let Some(gpu) = &self.gpu {
            encoder.resolve_query_set(&gpu.query_set, 0..QUERY_COUNT, &gpu.resolve_buffer, 0);
            encoder.copy_buffer_to_buffer(
                &gpu.resolve_buffer,
                0,
                &gpu.readback_buffer,
                0,
                RESOLVE_SIZE,
            );
        }
    }

    /// Waits for the submitted frame and returns its render time in
    /// milliseconds.
    pub async fn finish(&mut self, device: &wgpu::Device) -> anyhow::Result<f32> {
        let Some(gpu) = &self.gpu else {
            device.poll(wgpu::PollType::Wait {
                submission_index: None,
                timeout: Some(POLL_TIMEOUT),
            })?;
            let elapsed = self.started.take().map(|s| s.elapsed()).unwrap_or_default();
            return Ok(elapsed.as_secs_f32() * 1000.0);
        };

        // The mapping has to be requested before polling, otherwise the
        // receive below never completes.
        let slice = gpu.readback_buffer.slice(..);
        let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            // The receiver only goes away if `finish` was dropped mid-await.
            let _ = tx.send(result);
        });
        if let Err(e) = wait_for_map(device, rx).await {
            if e.map_outstanding() {
                // Aborts the pending map; next frame copies into the buffer again.
                gpu.readback_buffer.unmap();
            }
            self.started = None;
            return Err(e.into());
        }

        let ticks = {
            let data = slice.get_mapped_range();
            let start: u64 = bytemuck::pod_read_unaligned(&data[0..8]);
            let end: u64 = bytemuck::pod_read_unaligned(&data[8..16]);
            end.saturating_sub(start)
        };
        gpu.readback_buffer.unmap();
        self.started = None;
        Ok(ticks_to_ms(ticks, gpu.period))
    }
}

/// Why the timestamps could not be read back.
#[derive(Debug, thiserror::Error)]
pub enum ReadbackError {
    #[error("waiting for the frame failed: {0}")]
    Poll(#[from] wgpu::PollError),
    #[error("timestamp readback was cancelled")]
    Cancelled,
    #[error("could not map the timestamp buffer: {0}")]
    Map(#[from] wgpu::BufferAsyncError),
}

impl ReadbackError {
    /// The map request is still pending and has to be aborted before the
    /// buffer can be written again.
    pub fn map_outstanding(&self) -> bool {
        matches!(self, ReadbackError::Poll(_))
    }
}

async fn wait_for_map(
    device: &wgpu::Device,
    rx: futures_intrusive::channel::shared::OneshotReceiver<Result<(), wgpu::BufferAsyncError>>,
) -> Result<(), ReadbackError> {
    device.poll(wgpu::PollType::Wait {
        submission_index: None,
        timeout: Some(POLL_TIMEOUT),
    })?;
    rx.receive().await.ok_or(ReadbackError::Cancelled)??;
    Ok(())
}

pub fn ticks_to_ms(ticks: u64, period_ns: f32) -> f32 {
    (ticks as f64 * period_ns as f64 / 1_000_000.0) as f32
}

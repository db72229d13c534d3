use crate::config::ScanConfig;
use crate::driver::{CameraDriver, CameraHandle, Frame};
use crate::session::CalibrationSession;
use crate::types::DetectionGeometry;
use crate::zoom::{AdaptiveZoomController, ZoomDecision};
use crate::{Result, ScanError};
use crossbeam_channel::{Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// A positive detection from the decode service.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection<P> {
    pub geometry: DetectionGeometry,
    pub payload: P,
}

/// Opaque decode-attempt service.
pub trait DecodeService: Send {
    type Payload: Send + 'static;

    /// Try to find and decode a code in `frame`.
    fn decode(&mut self, frame: &Frame) -> Option<Detection<Self::Payload>>;
}

/// A decode accepted as final.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanResult<P> {
    pub payload: P,
    pub geometry: DetectionGeometry,
    /// Sequence number of the frame it was decoded from.
    pub frame_sequence: u64,
    /// Detections discarded for zoom changes since the previous result.
    pub discarded: u32,
}

/// Decode loop running on its own thread.
///
/// The thread owns the camera handle for its whole lifetime, so every
/// parameter read and write happens on this one worker.
pub struct ScanWorker<P, D: CameraDriver> {
    receiver: Receiver<ScanResult<P>>,
    stop_flag: Arc<AtomicBool>,
    thread: Option<std::thread::JoinHandle<CameraHandle<D>>>,
}

impl<P, D> ScanWorker<P, D>
where
    P: Send + 'static,
    D: CameraDriver + 'static,
{
    /// Start decoding frames from `camera`.
    ///
    /// With `config.bulk_mode` the worker keeps going after each accepted
    /// result; otherwise it stops after the first one.
    pub fn start<S>(
        camera: CameraHandle<D>,
        session: CalibrationSession,
        decoder: S,
        config: &ScanConfig,
    ) -> Result<ScanWorker<P, D>>
    where
        S: DecodeService<Payload = P> + 'static,
    {
        let (sender, receiver) = crossbeam_channel::bounded(16);
        let stop_flag = Arc::new(AtomicBool::new(false));
        let stop_clone = stop_flag.clone();
        let bulk_mode = config.bulk_mode;

        let thread = std::thread::Builder::new()
            .name("scanzoom-decode".into())
            .spawn(move || {
                let mut camera = camera;
                decode_loop(&mut camera, &session, decoder, sender, stop_clone, bulk_mode);
                camera
            })
            .map_err(|e| ScanError::WorkerSpawn(e.to_string()))?;

        Ok(ScanWorker {
            receiver,
            stop_flag,
            thread: Some(thread),
        })
    }

    /// Receive the next accepted result (blocks until available).
    pub fn recv(&self) -> Result<ScanResult<P>> {
        self.receiver.recv().map_err(|_| ScanError::StreamStopped)
    }

    pub fn try_recv(&self) -> Option<ScanResult<P>> {
        self.receiver.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Result<ScanResult<P>> {
        self.receiver.recv_timeout(timeout).map_err(|e| match e {
            crossbeam_channel::RecvTimeoutError::Timeout => ScanError::Timeout,
            crossbeam_channel::RecvTimeoutError::Disconnected => ScanError::StreamStopped,
        })
    }

    pub fn is_active(&self) -> bool {
        !self.stop_flag.load(Ordering::Relaxed)
    }

    /// Stop the worker and take the camera back.
    ///
    /// Returns `None` if the worker thread panicked.
    pub fn stop(mut self) -> Option<CameraHandle<D>> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Option<CameraHandle<D>> {
        self.stop_flag.store(true, Ordering::Relaxed);
        self.thread.take().and_then(|thread| thread.join().ok())
    }
}

impl<P, D: CameraDriver> Drop for ScanWorker<P, D> {
    fn drop(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

fn decode_loop<D, S>(
    camera: &mut CameraHandle<D>,
    session: &CalibrationSession,
    mut decoder: S,
    sender: Sender<ScanResult<S::Payload>>,
    stop_flag: Arc<AtomicBool>,
    bulk_mode: bool,
) where
    D: CameraDriver,
    S: DecodeService,
{
    let mut controller = AdaptiveZoomController::new();
    let mut discarded = 0u32;

    log::info!("Decode worker started (bulk mode: {})", bulk_mode);

    loop {
        if stop_flag.load(Ordering::Relaxed) {
            log::info!("Decode worker stopping (stop flag set)");
            break;
        }

        let frame = match camera.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => continue,
            Err(e) => {
                log::warn!("Frame read error: {}", e);
                std::thread::sleep(Duration::from_millis(10));
                continue;
            }
        };

        let Some(detection) = decoder.decode(&frame) else {
            log::trace!("No code in frame {}", frame.sequence);
            continue;
        };

        let decision = controller
            .evaluate_detection(
                camera,
                &detection.geometry,
                session.state(),
                session.framing_rect(),
            )
            .unwrap_or_else(|e| {
                log::warn!("Auto zoom skipped: {}", e);
                ZoomDecision::Accept
            });

        if decision == ZoomDecision::DiscardAndRetry {
            discarded += 1;
            log::debug!("Discarding decode from frame {} after zoom change", frame.sequence);
            continue;
        }

        let result = ScanResult {
            payload: detection.payload,
            geometry: detection.geometry,
            frame_sequence: frame.sequence,
            discarded,
        };
        discarded = 0;

        if let Err(e) = sender.try_send(result) {
            match e {
                crossbeam_channel::TrySendError::Full(_) => {
                    log::trace!("Result channel full, dropping result");
                }
                crossbeam_channel::TrySendError::Disconnected(_) => {
                    log::info!("Result channel disconnected, stopping decode worker");
                    break;
                }
            }
        }

        if !bulk_mode {
            break;
        }
    }

    stop_flag.store(true, Ordering::Relaxed);
}

//! Browser camera and face-mesh bindings
//!
//! The camera is opened once at startup. Face-mesh results arrive on the JS
//! event loop and are pushed into a shared [`FaceTracker`] mailbox that the
//! frame loop reads at frame start.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

use crate::sim::{FaceReport, FaceTracker, FaceTracking};

#[wasm_bindgen(inline_js = "
    let video = null;
    let faceMesh = null;
    let running = false;

    export function init_camera() {
        if (!navigator.mediaDevices || !navigator.mediaDevices.getUserMedia) {
            console.warn('getUserMedia not supported');
            return false;
        }
        if (typeof ml5 !== 'undefined') {
            faceMesh = ml5.faceMesh({ maxFaces: 1, refineLandmarks: true, flipHorizontal: false });
        } else {
            console.warn('ml5 not loaded - face mode disabled');
        }
        video = document.createElement('video');
        video.autoplay = true;
        video.muted = true;
        video.playsInline = true;
        navigator.mediaDevices
            .getUserMedia({ video: { width: 1280, height: 720 } })
            .then((stream) => {
                video.srcObject = stream;
                return video.play();
            })
            .catch((err) => {
                console.warn('Camera unavailable:', err);
                video = null;
            });
        return true;
    }

    export function camera_ready() {
        return !!(video && faceMesh && video.videoWidth > 0 && video.videoHeight > 0);
    }

    export function start_face_mesh(callback) {
        if (!camera_ready()) {
            return false;
        }
        running = true;
        faceMesh.detectStart(video, (results) => {
            if (!running || results.length === 0 || !results[0].keypoints) {
                return;
            }
            const k = results[0].keypoints;
            const flat = new Float32Array(k.length * 2);
            for (let i = 0; i < k.length; i++) {
                flat[2 * i] = k[i].x;
                flat[2 * i + 1] = k[i].y;
            }
            callback(flat);
        });
        return true;
    }

    export function stop_face_mesh() {
        running = false;
        if (faceMesh) {
            faceMesh.detectStop();
        }
    }
")]
extern "C" {
    fn init_camera() -> bool;
    fn camera_ready() -> bool;
    fn start_face_mesh(callback: &Closure<dyn FnMut(js_sys::Float32Array)>) -> bool;
    fn stop_face_mesh();
}

/// Ask for the webcam; returns false when the browser has no camera API
pub fn request_camera() -> bool {
    init_camera()
}

/// Face tracking backed by the browser camera and ml5 face mesh
pub struct WebFaceTracker {
    mailbox: Rc<RefCell<FaceTracker>>,
    callback: Closure<dyn FnMut(js_sys::Float32Array)>,
}

impl WebFaceTracker {
    pub fn new() -> Self {
        let mailbox = Rc::new(RefCell::new(FaceTracker::new(false)));
        let inbox = mailbox.clone();
        let callback = Closure::<dyn FnMut(js_sys::Float32Array)>::new(
            move |coords: js_sys::Float32Array| {
                let report = FaceReport::from_flat(&coords.to_vec());
                // Dropped while a frame holds the mailbox; the next result replaces it anyway
                if let Ok(mut tracker) = inbox.try_borrow_mut() {
                    tracker.deliver(report);
                }
            },
        );
        Self { mailbox, callback }
    }
}

impl Default for WebFaceTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl FaceTracking for WebFaceTracker {
    fn is_available(&self) -> bool {
        camera_ready()
    }

    fn start(&mut self) -> bool {
        let mut mailbox = self.mailbox.borrow_mut();
        mailbox.available = camera_ready();
        if !mailbox.start() {
            return false;
        }
        if !start_face_mesh(&self.callback) {
            log::warn!("Face mesh failed to start");
            mailbox.stop();
            return false;
        }
        log::info!("Face tracking started");
        true
    }

    fn stop(&mut self) {
        stop_face_mesh();
        self.mailbox.borrow_mut().stop();
    }

    fn is_running(&self) -> bool {
        self.mailbox.borrow().is_running()
    }

    fn latest(&self) -> Option<FaceReport> {
        self.mailbox.borrow().latest()
    }
}

use crate::dom::{self, Listener};
use crate::viewer::Viewer;
use panogaze_core::{OrientationSample, SensorPermission};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

/// Feed `deviceorientation` samples into the fusion. The listener only
/// records the latest value; the render and gaze ticks read it.
pub fn wire_device_orientation(viewer: Viewer) -> Option<Listener> {
    let window = web::window()?;
    Listener::typed(&window, "deviceorientation", move |ev: web::DeviceOrientationEvent| {
        let sample = OrientationSample {
            alpha: ev.alpha().map(|v| v as f32),
            beta: ev.beta().map(|v| v as f32),
            gamma: ev.gamma().map(|v| v as f32),
        };
        viewer
            .session
            .borrow_mut()
            .fusion_mut()
            .on_sensor_sample(sample, dom::is_landscape());
    })
}

enum PermissionRequest {
    Settled(SensorPermission),
    Pending(js_sys::Promise),
}

fn begin_request() -> PermissionRequest {
    let Some(window) = web::window() else {
        return PermissionRequest::Settled(SensorPermission::Denied);
    };
    let ctor = match js_sys::Reflect::get(&window, &JsValue::from_str("DeviceOrientationEvent")) {
        Ok(c) if !c.is_undefined() => c,
        _ => {
            log::warn!("[orientation] no DeviceOrientationEvent on this device");
            return PermissionRequest::Settled(SensorPermission::Denied);
        }
    };
    let request = js_sys::Reflect::get(&ctor, &JsValue::from_str("requestPermission"))
        .ok()
        .and_then(|f| f.dyn_into::<js_sys::Function>().ok());
    let Some(request) = request else {
        // Ungated browsers deliver events without asking.
        return PermissionRequest::Settled(SensorPermission::Granted);
    };
    match request.call0(&ctor).map(|p| p.dyn_into::<js_sys::Promise>()) {
        Ok(Ok(p)) => PermissionRequest::Pending(p),
        _ => PermissionRequest::Settled(SensorPermission::Denied),
    }
}

async fn settle(promise: js_sys::Promise) -> SensorPermission {
    match JsFuture::from(promise).await {
        Ok(state) if state.as_string().as_deref() == Some("granted") => SensorPermission::Granted,
        Ok(state) => {
            log::info!("[orientation] permission answer {:?}", state.as_string());
            SensorPermission::Denied
        }
        Err(e) => {
            log::warn!("[orientation] permission request failed: {:?}", e);
            SensorPermission::Denied
        }
    }
}

/// Ask for motion-sensor access where the browser gates it behind
/// `DeviceOrientationEvent.requestPermission()`. The request itself is issued
/// synchronously, so call this from inside a user gesture. Asks at most once.
pub fn request_sensor_permission(viewer: &Viewer) {
    if !viewer.session.borrow().fusion().needs_permission_request() {
        return;
    }
    match begin_request() {
        PermissionRequest::Settled(p) => {
            viewer.session.borrow_mut().fusion_mut().set_permission(p);
        }
        PermissionRequest::Pending(promise) => {
            let viewer = viewer.clone();
            spawn_local(async move {
                let p = settle(promise).await;
                log::info!("[orientation] sensor permission {:?}", p);
                viewer.session.borrow_mut().fusion_mut().set_permission(p);
            });
        }
    }
}

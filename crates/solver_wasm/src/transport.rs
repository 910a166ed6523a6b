//! `fetch`-backed [`Transport`].

use crate::bindings::js_message;
use solver_core::envelope::ImageRef;
use solver_core::transport::{Transport, TransportError};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, Request, RequestInit, RequestMode, Response, Url};

/// Posts through `window.fetch`. Graph images come back as object URLs owned by the page.
#[derive(Debug, Default, Clone, Copy)]
pub struct FetchTransport;

impl Transport for FetchTransport {
    type Response = Response;

    async fn post_json(&self, url: &str, body: String) -> Result<Response, TransportError> {
        let network = |err: JsValue| TransportError::Network(js_message(&err));

        let init = RequestInit::new();
        init.set_method("POST");
        init.set_mode(RequestMode::Cors);
        init.set_body(&JsValue::from_str(&body));

        let request = Request::new_with_str_and_init(url, &init).map_err(network)?;
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(network)?;

        let window = web_sys::window()
            .ok_or_else(|| TransportError::Network("No window available".to_string()))?;
        let value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(network)?;
        value
            .dyn_into::<Response>()
            .map_err(|_| TransportError::Network("fetch did not return a Response".to_string()))
    }

    fn status(&self, response: &Response) -> u16 {
        response.status()
    }

    async fn read_text(&self, response: Response) -> Result<String, TransportError> {
        let body = |err: JsValue| TransportError::Body(js_message(&err));
        let text = JsFuture::from(response.text().map_err(body)?)
            .await
            .map_err(body)?;
        text.as_string()
            .ok_or_else(|| TransportError::Body("body is not text".to_string()))
    }

    async fn read_image(&self, response: Response) -> Result<ImageRef, TransportError> {
        let image = |err: JsValue| TransportError::Image(js_message(&err));
        let blob = JsFuture::from(response.blob().map_err(image)?)
            .await
            .map_err(image)?
            .dyn_into::<Blob>()
            .map_err(|_| TransportError::Image("body is not a blob".to_string()))?;
        Url::create_object_url_with_blob(&blob)
            .map(ImageRef)
            .map_err(image)
    }
}

/// Releases an object URL created by [`FetchTransport::read_image`].
pub(crate) fn release_image(image: &ImageRef) {
    if let Err(err) = Url::revoke_object_url(image.as_str()) {
        log::debug!("failed to revoke {}: {}", image.as_str(), js_message(&err));
    }
}

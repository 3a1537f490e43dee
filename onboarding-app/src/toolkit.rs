//! Stand-in for a UI toolkit: shows and hides elements after a short
//! transition, the way a real one reports appear/disappear callbacks.

use std::sync::Arc;
use std::time::Duration;
use wayfinder::kit::Element;

const TRANSITION: Duration = Duration::from_millis(250);

pub fn present<E: Element>(element: Arc<E>) {
    tokio::spawn(async move {
        tokio::time::sleep(TRANSITION).await;
        element.did_appear();
    });
}

pub fn hide<E: Element>(element: Arc<E>) {
    tokio::spawn(async move {
        tokio::time::sleep(TRANSITION).await;
        element.did_disappear();
    });
}

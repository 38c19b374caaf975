use std::sync::{Arc, Mutex};

use bevy::prelude::*;
use constants::path::{LABEL_ELEMENT_ID, SLIDER_ELEMENT_ID};
use wasm_bindgen::prelude::*;
use web_sys::{Event, HtmlInputElement, window};

use crate::ui::slider::{SliderInput, SliderInputSource, SnapshotSlider};
use crate::ui::status_label::StatusLabel;

/// Values written by the page's range input, drained once per frame.
#[derive(Resource)]
pub struct DomSliderQueue(Arc<Mutex<Vec<i64>>>);

fn element_by_id(id: &str) -> Option<web_sys::Element> {
    window()?.document()?.get_element_by_id(id)
}

fn slider_element() -> Option<HtmlInputElement> {
    element_by_id(SLIDER_ELEMENT_ID)?.dyn_into::<HtmlInputElement>().ok()
}

pub fn setup_dom_slider(mut commands: Commands) {
    let Some(input) = slider_element() else {
        warn!("No #{} range input on the page; page slider disabled", SLIDER_ELEMENT_ID);
        return;
    };
    input.set_disabled(true);

    let queue: Arc<Mutex<Vec<i64>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = queue.clone();
    let target = input.clone();

    let closure = Closure::wrap(Box::new(move |_event: Event| {
        if let Ok(value) = target.value().parse::<f64>() {
            if let Ok(mut queue) = queue_clone.lock() {
                queue.push(value.round() as i64);
            }
        }
    }) as Box<dyn FnMut(Event)>);

    if let Err(error) =
        input.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref())
    {
        error!("Failed to register slider listener: {:?}", error);
    }

    // The listener lives for the whole page.
    closure.forget();
    commands.insert_resource(DomSliderQueue(queue));
}

pub fn forward_dom_slider_input(
    queue: Option<Res<DomSliderQueue>>,
    mut inputs: EventWriter<SliderInput>,
) {
    let Some(queue) = queue else {
        return;
    };
    let values = match queue.0.lock() {
        Ok(mut values) => std::mem::take(&mut *values),
        Err(_) => Vec::new(),
    };
    inputs.write_batch(
        values
            .into_iter()
            .map(|raw| SliderInput::new(raw, SliderInputSource::Dom)),
    );
}

/// Mirror range, value and enabled state onto the page slider.
pub fn sync_dom_slider(slider: Res<SnapshotSlider>) {
    if !slider.is_changed() {
        return;
    }
    let Some(input) = slider_element() else {
        return;
    };
    input.set_min(&slider.min.to_string());
    input.set_max(&slider.max.to_string());
    input.set_value(&slider.value.to_string());
    input.set_disabled(!slider.configured);
}

pub fn sync_dom_label(label: Res<StatusLabel>) {
    if !label.is_changed() {
        return;
    }
    match element_by_id(LABEL_ELEMENT_ID) {
        Some(element) => element.set_text_content(Some(label.text())),
        None => debug!("No #{} element for the status label", LABEL_ELEMENT_ID),
    }
}

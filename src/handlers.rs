// handlers.rs

use crate::{
    color::Hsv,
    error::AppError,
    models::{AppState, BrightnessForm, ColorForm, TemperatureForm, ToggleForm},
    page,
};
use axum::{
    Form, Router,
    extract::State,
    response::Html,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/toggle", post(toggle))
        .route("/brightness", post(brightness))
        .route("/color", post(color))
        .route("/temperature", post(temperature))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn home(State(state): State<Arc<AppState>>) -> Html<String> {
    let status = if state.motion.is_active() {
        "Motion Active"
    } else {
        "Ready"
    };
    page::render(status)
}

pub async fn toggle(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ToggleForm>,
) -> Html<String> {
    let on = form.power();
    info!(on, "Manual power switch");
    state.fleet.set_power(on).await;
    page::render("Switched")
}

pub async fn brightness(
    State(state): State<Arc<AppState>>,
    Form(form): Form<BrightnessForm>,
) -> Result<Html<String>, AppError> {
    let level = form.level()?;
    info!(level, "Manual brightness");
    state.fleet.set_brightness(level).await;
    Ok(page::render(&format!("Brightness {}%", level)))
}

pub async fn color(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ColorForm>,
) -> Result<Html<String>, AppError> {
    let hex = form
        .hex_color
        .as_deref()
        .ok_or(AppError::MissingField("hex_color"))?;
    let hsv = Hsv::from_hex(hex)?;
    info!(hex, ?hsv, "Manual color");
    state.fleet.set_color(hsv).await;
    Ok(page::render("Color Set"))
}

pub async fn temperature(
    State(state): State<Arc<AppState>>,
    Form(form): Form<TemperatureForm>,
) -> Result<Html<String>, AppError> {
    let kelvin = form.kelvin()?;
    info!(kelvin, "Manual white temperature");
    state.fleet.set_color_temp(kelvin).await;
    Ok(page::render(&format!("Temp {}K", kelvin)))
}

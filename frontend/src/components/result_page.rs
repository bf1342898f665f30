use shared::{PredictionStatus, Verdict};
use yew::prelude::*;

use super::utils::debounce;
use crate::app::{App, Msg, ScanOutcome};

pub fn render(ctx: &Context<App>, outcome: &ScanOutcome) -> Html {
    let link = ctx.link().clone();
    let report = &outcome.report;

    let body = if report.status == PredictionStatus::Failed {
        let reason = report
            .error_message
            .as_deref()
            .unwrap_or("The assessment could not be produced for this photo.");
        html! {
            <div class="results-container assessment-failed">
                <h2><i class="fa-solid fa-triangle-exclamation"></i>{" Assessment failed"}</h2>
                <p>{ reason }</p>
            </div>
        }
    } else {
        html! {
            <div class="results-container">
                <h2><i class="fa-solid fa-clipboard-check"></i>{" Condition report"}</h2>
                { render_preview(outcome) }
                <div class="verdicts">
                    { render_verdict("Cleanliness", report.cleanliness.as_ref()) }
                    { render_verdict("Bodywork", report.integrity.as_ref()) }
                </div>
                { render_footnote(report.model_version.as_deref(), report.processing_time_ms) }
            </div>
        }
    };

    html! {
        <div class="result-section">
            { body }
            <div class="button-container">
                <button
                    class="scan-btn"
                    onclick={debounce(300, {
                        let link = link.clone();
                        move || link.callback(|_| Msg::Restart).emit(())
                    })}
                >
                    <i class="fa-solid fa-rotate-left"></i>{" Check another car"}
                </button>
                <button
                    class="scan-btn"
                    style="background-color: var(--primary-color);"
                    onclick={debounce(300, {
                        let link = link.clone();
                        move || link.callback(|_| Msg::ShowMap).emit(())
                    })}
                >
                    <i class="fa-solid fa-map-location-dot"></i>{" Continue"}
                </button>
            </div>
        </div>
    }
}

fn render_preview(outcome: &ScanOutcome) -> Html {
    if let Some(url) = &outcome.preview_url {
        html! {
            <img
                class="result-photo"
                src={url.to_string()}
                alt="Checked vehicle"
                style="max-width: 100%; max-height: 240px; object-fit: contain;"
            />
        }
    } else {
        html! {}
    }
}

fn render_verdict(label: &str, verdict: Option<&Verdict>) -> Html {
    let Some(verdict) = verdict else {
        return html! {
            <div class="result-item">
                <div class="result-label">{ label }</div>
                <div class="result-value">{"not assessed"}</div>
            </div>
        };
    };

    let percentage = verdict.confidence * 100.0;
    html! {
        <div class="result-item">
            <div class="result-label">{ label }</div>
            <div class="verdict-status">{ &verdict.status }</div>
            <div class="confidence-meter">
                <div class="meter-label">{"Confidence:"}</div>
                <div class="meter">
                    <div class="meter-fill" style={format!("width: {percentage}%")}></div>
                </div>
                <div class="meter-value">{ format!("{percentage:.1}%") }</div>
            </div>
        </div>
    }
}

fn render_footnote(model_version: Option<&str>, processing_time_ms: Option<u64>) -> Html {
    let mut parts = Vec::new();
    if let Some(version) = model_version {
        parts.push(format!("model {version}"));
    }
    if let Some(ms) = processing_time_ms {
        parts.push(format!("processed in {ms} ms"));
    }
    if parts.is_empty() {
        html! {}
    } else {
        html! { <p class="result-footnote">{ parts.join(", ") }</p> }
    }
}

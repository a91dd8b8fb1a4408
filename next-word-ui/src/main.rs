use std::time::Duration;

use clap::Parser;
use eframe::{egui, Frame};
use egui::{Color32, Context, RichText};
use log::warn;
use serde::Deserialize;

use reqwest::blocking::Client;
use reqwest::Result;

/// Command-line configuration of the UI.
#[derive(Parser, Debug)]
#[command(name = "next-word-ui")]
struct Args {
    /// Base URL of the next-word server
    #[arg(long, env = "NEXT_WORD_SERVER", default_value = "http://127.0.0.1:5000")]
    server: String,
}

/// `/v1/predict` response, mirrored from the server.
#[derive(Deserialize, Debug, Clone)]
struct PredictResponse {
    input: String,
    prediction: String,
    next_word: Option<String>,
    sequence: Option<String>,
    recognized: bool,
}

/// `/v1/model` response, mirrored from the server.
#[derive(Deserialize, Debug, Clone)]
struct ModelInfo {
    name: String,
    architecture: String,
    vocabulary_size: usize,
    sequence_length: usize,
    embedding_dim: usize,
    lstm_units: Vec<usize>,
}

/// What the result area currently shows.
#[derive(Debug)]
enum Outcome {
    Prediction(PredictResponse),
    Warning(String),
    Error(String),
}

/// REST context holding a reusable blocking HTTP client.
struct RESTContext {
    client: Client,
    base_url: String,
}

impl RESTContext {
    /// Creates a new REST context with a timeout.
    fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::new(5, 0))
            .build()?;
        Ok(Self { client, base_url: base_url.trim_end_matches('/').to_owned() })
    }

    /// Sends a GET request to `/v1/predict` with the text as query parameter.
    fn get_prediction(&self, text: &str) -> Result<PredictResponse> {
        self.client
            .get(format!("{}/v1/predict", self.base_url))
            .query(&[("text", text)])
            .send()?
            .error_for_status()?
            .json()
    }

    /// Sends a GET request to `/v1/model`.
    fn get_model_info(&self) -> Result<ModelInfo> {
        self.client
            .get(format!("{}/v1/model", self.base_url))
            .send()?
            .error_for_status()?
            .json()
    }
}

/// Global UI state (MUST persist between frames in egui).
struct PredictorUI {
    rest: RESTContext,
    input_text: String,
    outcome: Option<Outcome>,
    model_info: Option<ModelInfo>,
}

impl PredictorUI {
    /// Initializes the UI and fetches the model details once.
    fn new(base_url: &str) -> Result<Self> {
        let mut ui = Self {
            rest: RESTContext::new(base_url)?,
            input_text: String::new(),
            outcome: None,
            model_info: None,
        };
        ui.get_model_info();
        Ok(ui)
    }

    /// Performs the prediction request.
    fn get_prediction(&mut self) {
        if self.input_text.trim().is_empty() {
            self.outcome = Some(Outcome::Warning("Please enter some text to predict the next word.".to_owned()));
            return;
        }
        self.outcome = Some(match self.rest.get_prediction(&self.input_text) {
            Ok(response) => Outcome::Prediction(response),
            Err(e) => Outcome::Error(format!("Error during prediction: {e}")),
        });
    }

    /// Performs the model details request.
    fn get_model_info(&mut self) {
        match self.rest.get_model_info() {
            Ok(info) => self.model_info = Some(info),
            Err(e) => warn!("Failed to fetch model details: {e}"),
        }
    }

    fn show_model_info(&mut self, ui: &mut egui::Ui) {
        ui.heading("Model Information");
        ui.separator();

        let mut retry = false;
        match &self.model_info {
            Some(info) => {
                egui::Grid::new("model_grid").num_columns(2).striped(true).show(ui, |ui| {
                    ui.label("Model");
                    ui.label(info.name.as_str());
                    ui.end_row();
                    ui.label("Architecture");
                    ui.label(info.architecture.as_str());
                    ui.end_row();
                    ui.label("Vocabulary size");
                    ui.label(format!("{} words", info.vocabulary_size));
                    ui.end_row();
                    ui.label("Sequence length");
                    ui.label(format!("{} words", info.sequence_length));
                    ui.end_row();
                    ui.label("Embedding size");
                    ui.label(info.embedding_dim.to_string());
                    ui.end_row();
                    ui.label("LSTM units");
                    ui.label(format!("{:?}", info.lstm_units));
                    ui.end_row();
                });
            }
            None => {
                ui.label("Model details unavailable");
                retry = ui.button("Retry").clicked();
            }
        }
        if retry {
            self.get_model_info();
        }

        ui.add_space(12.0);
        ui.heading("Tips for Best Results");
        ui.separator();
        ui.label("• Use words the model was trained on");
        ui.label("• Try phrases like \"to be or not\"");
        ui.label("• Keep input text reasonably short");
    }

    fn show_outcome(ui: &mut egui::Ui, outcome: &Outcome) {
        match outcome {
            Outcome::Prediction(response) if response.recognized => {
                ui.colored_label(Color32::from_rgb(86, 171, 47), "Prediction complete!");
                if let Some(word) = &response.next_word {
                    ui.label(RichText::new(word.as_str()).strong().size(24.0));
                }
                if let Some(sequence) = &response.sequence {
                    ui.label(RichText::new(format!("\"{sequence}\"")).italics());
                }
            }
            Outcome::Prediction(response) => {
                ui.colored_label(Color32::from_rgb(245, 87, 108), response.prediction.as_str());
                ui.label(format!("The model couldn't find a good prediction for \"{}\".", response.input));
                ui.label("Tip: try using words the model has seen during training.");
            }
            Outcome::Warning(message) => {
                ui.colored_label(Color32::from_rgb(240, 147, 43), message.as_str());
            }
            Outcome::Error(message) => {
                ui.colored_label(Color32::RED, message.as_str());
                ui.label("Make sure the next-word server is running and its artifacts are loaded.");
            }
        }
    }
}

impl eframe::App for PredictorUI {
    /// UI update loop (called every frame).
    fn update(&mut self, ctx: &Context, _: &mut Frame) {
        egui::SidePanel::left("model_info")
            .resizable(false)
            .default_width(220.0)
            .show(ctx, |ui| self.show_model_info(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("Next Word Predictor");
                ui.label("Powered by an LSTM network");
            });
            ui.separator();

            ui.label("Enter your text");
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.input_text)
                    .hint_text("Type your text here... (e.g., 'to be or not')")
                    .desired_width(f32::INFINITY),
            );
            let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

            ui.add_space(8.0);
            if ui
                .add_sized([200.0, 40.0], egui::Button::new("Predict Next Word"))
                .clicked()
                || submitted
            {
                self.get_prediction();
            }

            ui.add_space(12.0);
            match &self.outcome {
                Some(outcome) => PredictorUI::show_outcome(ui, outcome),
                None => {
                    ui.label("Click Predict Next Word to start");
                }
            }
        });
    }
}

/// Application entry point.
fn main() -> eframe::Result {
    env_logger::init();
    let args = Args::parse();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([720.0, 420.0])
            .with_resizable(true),
        ..Default::default()
    };

    eframe::run_native(
        "next-word-predictor",
        options,
        Box::new(move |_| Ok(Box::new(PredictorUI::new(&args.server)?))),
    )
}

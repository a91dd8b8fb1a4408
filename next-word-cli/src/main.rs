use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use next_word_core::{Artifacts, Prediction, Predictor};

#[derive(Parser, Debug)]
#[command(name = "next-word")]
#[command(about = "Predict the next word of a text using a saved LSTM model")]
struct Args {
    /// Path to the model artifact
    #[arg(short, long, env = "NEXT_WORD_MODEL", default_value = "./data/next_word_lstm.bin")]
    model: PathBuf,

    /// Path to the vocabulary artifact
    #[arg(short, long, env = "NEXT_WORD_VOCABULARY", default_value = "./data/tokenizer.json")]
    vocabulary: PathBuf,

    /// If provided, predict once for this text then exit
    #[arg(short, long)]
    text: Option<String>,

    /// Print the model details and exit
    #[arg(long)]
    info: bool,
}

/// Formats a prediction the way the interactive loop shows it.
fn render(text: &str, prediction: &Prediction) -> String {
    match prediction.word() {
        Some(word) => format!("Next word: {word}\nComplete sequence: \"{} {word}\"", text.trim()),
        None => format!("{prediction} (the model couldn't find a good prediction for this text)"),
    }
}

fn predict_and_print(predictor: &Predictor, text: &str) -> Result<(), Box<dyn std::error::Error>> {
    let prediction = predictor.predict(text)?;
    println!("{}", render(text, &prediction));
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    // Load both artifacts, stop here if either is missing
    let artifacts = Artifacts::load(&args.model, &args.vocabulary)?;
    let predictor = artifacts.predictor();

    if args.info {
        let info = artifacts.info();
        println!("Model:           {}", info.name);
        println!("Architecture:    {}", info.architecture);
        println!("Vocabulary size: {} words", info.vocabulary_size);
        println!("Sequence length: {} words", info.sequence_length);
        println!("Embedding size:  {}", info.embedding_dim);
        println!("LSTM units:      {:?}", info.lstm_units);
        return Ok(());
    }

    // Single-shot prediction if --text provided
    if let Some(text) = args.text {
        return predict_and_print(&predictor, &text);
    }

    println!("--- Next Word Predictor ---");
    println!("Type some text (e.g. 'to be or not') and press Enter, 'exit' to quit.");

    let stdin = io::stdin();
    loop {
        print!("\n> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let text = line.trim();
        if text.eq_ignore_ascii_case("exit") {
            break;
        }
        if text.is_empty() {
            println!("Please enter some text to predict the next word.");
            continue;
        }

        if let Err(e) = predict_and_print(&predictor, text) {
            eprintln!("Error during prediction: {e}");
        }
    }

    Ok(())
}

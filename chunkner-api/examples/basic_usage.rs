//! Basic usage example for the chunkner API

use chunkner_api::capability::{BasicTokenizer, FnClassifier, LexiconClassifier, RawDetection};
use chunkner_api::{process_text, Config, NerProcessor};

const LEXICON: &str = r#"
[[entity]]
label = "DISEASE"
score = 0.9
terms = ["lung cancer", "non-small cell lung cancer"]

[[entity]]
label = "CHEMICAL"
score = 0.95
terms = ["cisplatin", "aspirin"]
"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Method 1: Convenience function with a lexicon
    println!("=== Method 1: Convenience Function ===");
    let text = "Patients with non-small cell lung cancer received cisplatin.";
    let output = process_text(text, LexiconClassifier::from_toml_str(LEXICON)?)?;

    for entity in &output.entities {
        println!(
            "  {:<9} {:>3}..{:<3} {:.2}  {}",
            entity.label, entity.start, entity.end, entity.score, entity.text
        );
    }
    println!("Processing took {}ms\n", output.metadata.processing_time_ms);

    // Method 2: Small windows over a long document
    println!("=== Method 2: Windowed Document ===");
    let config = Config::builder().max_tokens(32).stride_tokens(8).build()?;
    let processor = NerProcessor::with_config(
        config,
        BasicTokenizer::new(),
        LexiconClassifier::from_toml_str(LEXICON)?,
    )?;

    let document = "Aspirin was stopped before surgery for lung cancer. ".repeat(20);
    let output = processor.process_text(&document)?;
    println!(
        "{} entities from {} windows ({} raw detections)\n",
        output.len(),
        output.metadata.windows,
        output.metadata.raw_detections
    );

    // Method 3: Any closure can act as the model
    println!("=== Method 3: Closure Classifier ===");
    let capitalised = FnClassifier::new(|chunk: &str| {
        let mut found = Vec::new();
        let mut offset = 0;
        for word in chunk.split(' ') {
            if word.chars().next().is_some_and(char::is_uppercase) {
                found.push(RawDetection::new("PROPER", 0.5, offset, offset + word.len(), word));
            }
            offset += word.len() + 1;
        }
        Ok(found)
    });
    let output = process_text("Dr Smith met Anna in Zürich", capitalised)?;
    for entity in &output.entities {
        println!("  {} {}", entity.label, entity.text);
    }

    Ok(())
}

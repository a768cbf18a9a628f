//! Basic usage of the task facades
//!
//! Needs Java and the toolkit binaries under the default binary directory.

use farasa_api::{Config, PosTagger, Segmenter, Stemmer};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let text = "يستخدم البرنامج لغة البرمجة رست";

    // Method 1: standalone mode, one worker process per call
    println!("=== Standalone segmentation ===");
    let mut segmenter = Segmenter::new()?;
    let segmented = segmenter.segment(text)?;
    println!("segmented:   {segmented}");
    println!("desegmented: {}", segmenter.desegment(text)?);

    // Method 2: interactive mode keeps one primed worker alive
    println!("\n=== Interactive stemming ===");
    let mut stemmer = Stemmer::with_config(Config::interactive())?;
    for line in ["الكتب المفيدة", "يدرسون في الجامعات"] {
        println!("{line} -> {}", stemmer.stem(line)?);
    }
    stemmer.terminate();

    // Method 3: custom configuration and structured output
    println!("\n=== POS tagging without cache ===");
    let config = Config::builder().cache(false).build()?;
    let mut tagger = PosTagger::with_config(config)?;
    for token in tagger.tag_segments(text, true)? {
        println!("  {token}");
    }

    Ok(())
}

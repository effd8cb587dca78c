extern crate serde_derive;
extern crate wordwand_trace;

use anyhow::Context;
use serde_derive::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::time::Instant;
use wordwand_trace::{Band, CheckOutcome, Point, Stroke, TraceConfig};

const DEFAULT_INPUTS: &str = "debug/attempts.jsonl";

// One recorded tracing attempt, as logged by the page
#[derive(Serialize, Deserialize)]
struct Attempt {
    letter: char,
    strokes: Vec<Vec<[f32; 2]>>,
    // Band a reviewer assigned by eye, if any
    #[serde(default)]
    expected: Option<Band>,
}

fn read_attempts(fname: &str) -> anyhow::Result<Vec<Attempt>> {
    let file = File::open(fname).with_context(|| format!("Failed to open {}", fname))?;
    let mut res: Vec<Attempt> = Vec::new();
    for (ix, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let attempt: Attempt = serde_json::from_str(&line)
            .with_context(|| format!("Bad attempt on line {}", ix + 1))?;
        res.push(attempt);
    }
    Ok(res)
}

fn read_config(fname: Option<&String>) -> anyhow::Result<TraceConfig> {
    match fname {
        Some(fname) => {
            let json = std::fs::read_to_string(fname).with_context(|| format!("Failed to read {}", fname))?;
            Ok(TraceConfig::from_json(&json)?)
        }
        None => Ok(TraceConfig::default()),
    }
}

fn get_strokes(raw: &Vec<Vec<[f32; 2]>>) -> Vec<Stroke> {
    let mut strokes: Vec<Stroke> = Vec::with_capacity(raw.len());
    for raw_stroke in raw {
        let points: Vec<Point> = raw_stroke.iter().map(|pt| Point::new(pt[0], pt[1])).collect();
        strokes.push(Stroke { points: points });
    }
    strokes
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let inputs = args.get(1).map(|s| s.as_str()).unwrap_or(DEFAULT_INPUTS);
    let config = read_config(args.get(2))?;

    let attempts = read_attempts(inputs)?;
    log::info!("Loaded {} attempts from {}", attempts.len(), inputs);

    let start = Instant::now();
    let mut agreed = 0;
    let mut labelled = 0;
    for attempt in &attempts {
        let strokes = get_strokes(&attempt.strokes);
        let res = wordwand_trace::score_typed(attempt.letter, &strokes, &config)
            .with_context(|| format!("Cannot score letter {:?}", attempt.letter))?;
        let band = match res.outcome {
            CheckOutcome::Empty => None,
            CheckOutcome::Scored { band, .. } => Some(band),
        };
        println!("{}  {:6.2}  {:?}  {}", res.letter, res.outcome.score(), band, res.feedback.message);
        if let Some(expected) = attempt.expected {
            labelled += 1;
            if band == Some(expected) {
                agreed += 1;
            }
        }
    }
    let duration = start.elapsed();
    println!("Scored {} attempts in {:?}. Agreed with {} of {} labels.", attempts.len(), duration, agreed, labelled);
    Ok(())
}

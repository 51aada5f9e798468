//! REPL command parsing and dispatch.
//!
//! Every handler reports recoverable conditions on stdout and returns;
//! a bad name or an unsupported window never ends the session.

use std::fs;
use std::path::PathBuf;

use tracing::warn;

use sonalyze_core::io::wav::{load_wav, save_wav};
use sonalyze_core::render::prepare_plot;
use sonalyze_core::synth::generate_wave;
use sonalyze_core::{PlotKind, WindowFunction};

use crate::settings::AppSettings;
use crate::state::AppState;

/// Whether the REPL should keep running after a command.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Quit,
}

/// Parse one input line and run the matching command.
pub fn dispatch(state: &mut AppState, settings: &AppSettings, line: &str) -> Outcome {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some((&cmd, args)) = tokens.split_first() else {
        return Outcome::Continue;
    };

    match cmd.to_ascii_lowercase().as_str() {
        "load" => cmd_load(state, settings, args),
        "gen" => cmd_gen(state, args),
        "clean" | "cut" => cmd_clean(state, args),
        "dft" => cmd_dft(state, args),
        "plot" => cmd_plot(state, settings, args),
        "save" => cmd_save(state, settings, args),
        "list" => cmd_list(state, args),
        "quit" | "exit" => {
            println!("Bye");
            return Outcome::Quit;
        }
        _ => print_help(),
    }
    Outcome::Continue
}

/// Load every `*.wav` in the input directory, named by file stem.
pub fn autoload(state: &mut AppState, settings: &AppSettings) {
    let entries = match fs::read_dir(&settings.input_dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %settings.input_dir.display(), error = %e, "cannot scan input directory");
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if !path
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("wav"))
        {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if state.contains(name) {
            continue;
        }
        match load_wav(name, &path) {
            Ok(buffer) => {
                println!("Sound wave loaded: {name}");
                state.insert(buffer);
            }
            Err(e) => println!("Skipping {}: {e}", path.display()),
        }
    }
}

fn cmd_load(state: &mut AppState, settings: &AppSettings, args: &[&str]) {
    if args.is_empty() {
        println!("Invalid syntax:");
        println!("load <name> [...names] ::: loads <input dir>/<name>.wav");
        return;
    }

    for &name in args {
        if state.contains(name) {
            println!("File already loaded: {name}");
            continue;
        }
        let path = settings.input_dir.join(format!("{name}.wav"));
        match load_wav(name, &path) {
            Ok(buffer) => {
                state.insert(buffer);
                println!("Sound wave loaded: {name}");
            }
            Err(e) => println!("{e}"),
        }
    }
}

fn cmd_gen(state: &mut AppState, args: &[&str]) {
    let parsed = match args {
        [name, harmonics, duration] => harmonics
            .parse::<u32>()
            .ok()
            .zip(duration.parse::<f64>().ok().filter(|d| d.is_finite() && *d >= 0.0))
            .map(|(h, d)| (*name, h, d)),
        _ => None,
    };
    let Some((name, harmonics, duration_ms)) = parsed else {
        println!("Invalid syntax:");
        println!("gen <name> <harmonics> <duration-ms> ::: synthesizes a random harmonic wave");
        return;
    };

    if state.contains(name) {
        println!("File already loaded: {name}");
        return;
    }

    let buffer = generate_wave(name, harmonics, duration_ms, &mut state.rng);
    println!(
        "Sound wave generated: {name} ({} samples at 44100 Hz)",
        buffer.samples.len()
    );
    state.insert(buffer);
}

fn cmd_clean(state: &mut AppState, args: &[&str]) {
    let detector = state.detector.clone();
    let targets: Vec<String> = if args.is_empty() {
        state.names().map(str::to_string).collect()
    } else {
        args.iter().map(|s| s.to_string()).collect()
    };

    if targets.is_empty() {
        println!("No sound waves loaded");
        return;
    }

    for name in targets {
        match state.get_mut(&name) {
            Ok(buffer) => {
                detector.trim(buffer);
                if buffer.speech_detected {
                    println!("Sound wave {name} cleaned");
                } else {
                    println!("Sound wave {name} cleaned — no speech detected");
                }
            }
            Err(e) => println!("{e}"),
        }
    }
}

fn cmd_dft(state: &mut AppState, args: &[&str]) {
    let (name, window_ms, window_name) = match args {
        [name, window_ms] => (*name, *window_ms, "none"),
        [name, window_ms, window_name] => (*name, *window_ms, *window_name),
        _ => {
            println!("Invalid syntax:");
            println!("dft <name> <window-ms> [none|hamming|hanning] ::: single-sided spectrum");
            return;
        }
    };

    let Ok(window_ms) = window_ms.parse::<f64>() else {
        println!("Not a window duration: {window_ms}");
        return;
    };
    let window = match window_name.parse::<WindowFunction>() {
        Ok(w) => w,
        Err(e) => {
            println!("{e}");
            return;
        }
    };

    let sample_rate = match state.get(name) {
        Ok(buffer) => buffer.sample_rate,
        Err(e) => {
            println!("{e}");
            return;
        }
    };

    match state.spectrum(name, window_ms, window) {
        Ok(spectrum) if spectrum.is_empty() => {
            println!("Spectrum of {name}: empty (window rounds to zero samples)");
        }
        Ok(spectrum) => {
            let frame_len = (sample_rate as f64 * window_ms / 1000.0).round();
            let bin_hz = sample_rate as f64 / frame_len;
            let (peak_bin, peak) = spectrum
                .iter()
                .enumerate()
                .max_by(|a, b| a.1.total_cmp(b.1))
                .map(|(k, &m)| (k, m))
                .unwrap_or((0, 0.0));
            println!(
                "Spectrum of {name}: {} bins, {:.2} Hz per bin",
                spectrum.len(),
                bin_hz
            );
            println!(
                "  peak {:.1} Hz at magnitude {:.4}",
                peak_bin as f64 * bin_hz,
                peak
            );
        }
        Err(e) => println!("{e}"),
    }
}

fn cmd_plot(state: &mut AppState, settings: &AppSettings, args: &[&str]) {
    // A recognised plot type may lead the arguments; everything else is a
    // wave name. Default type is waveform.
    let (kind, names) = match args.split_first() {
        Some((&first, rest)) => match first.parse::<PlotKind>() {
            Ok(kind) => (kind, rest),
            Err(_) => (PlotKind::Waveform, args),
        },
        None => (PlotKind::Waveform, args),
    };

    let (buffers, missing) = state.resolve(names);
    for name in &missing {
        println!("Sound wave {name} not loaded");
    }
    if buffers.is_empty() {
        println!("No sound waves to plot");
        return;
    }

    let data = match prepare_plot(kind, &buffers, &state.detector) {
        Ok(data) => data,
        Err(e) => {
            println!("{e}");
            return;
        }
    };

    let stem = if buffers.len() == 1 {
        buffers[0].name.clone()
    } else {
        "all".to_string()
    };
    match export_json(settings, &format!("{stem}.{kind}.json"), &data) {
        Ok(path) => println!("Plot data written: {}", path.display()),
        Err(e) => println!("{e}"),
    }
}

fn export_json<T: serde::Serialize>(
    settings: &AppSettings,
    file_name: &str,
    data: &T,
) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(&settings.output_dir)?;
    let path = settings.output_dir.join(file_name);
    let json = serde_json::to_string_pretty(data)?;
    fs::write(&path, json)?;
    Ok(path)
}

fn cmd_save(state: &mut AppState, settings: &AppSettings, args: &[&str]) {
    let (name, file_name) = match args {
        [name] => (*name, format!("{name}.wav")),
        [name, file_name] => (*name, (*file_name).to_string()),
        _ => {
            println!("Invalid syntax:");
            println!("save <name> [filename] ::: writes the wave to the output directory");
            return;
        }
    };

    let buffer = match state.get(name) {
        Ok(buffer) => buffer,
        Err(e) => {
            println!("{e}");
            return;
        }
    };

    if let Err(e) = fs::create_dir_all(&settings.output_dir) {
        println!("{e}");
        return;
    }
    let path = settings.output_dir.join(file_name);
    match save_wav(buffer, &path) {
        Ok(()) => println!("Sound wave saved: {}", path.display()),
        Err(e) => println!("{e}"),
    }
}

fn cmd_list(state: &AppState, args: &[&str]) {
    let filter = args.first().copied().unwrap_or("");
    let names = state.names_like(filter);
    if names.is_empty() {
        println!("No sound waves loaded");
        return;
    }

    println!("Sound waves available:");
    for name in names {
        // Resolved from names_like, so the lookup cannot fail.
        if let Ok(buffer) = state.get(name) {
            let flag = if buffer.cleaned { ", cleaned" } else { "" };
            println!(
                "\t{name} ({} Hz, {:.3} s{flag})",
                buffer.sample_rate,
                buffer.duration_secs()
            );
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("clean <name> [...names] ::: Removes non-speech parts of the selected sound waves");
    println!("dft <name> <window-ms> [none|hamming|hanning] ::: Prints the single-sided spectrum of a wave");
    println!("gen <name> <harmonics> <duration-ms> ::: Synthesizes a random multi-harmonic wave");
    println!("help ::: Shows this menu");
    println!("list [like] ::: Lists loaded waves, optionally filtered by name");
    println!("load <name> [...names] ::: Loads each <name>.wav from the input directory");
    println!("plot [waveform|spectrogram|histogram] [...names] ::: Exports plot data for the selected waves (all when omitted)");
    println!("save <name> [filename] ::: Writes a wave into the output directory");
    println!("quit ::: Closes the application");
}

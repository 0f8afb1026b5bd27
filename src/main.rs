use anyhow::Result;
use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use yoga_mate::camera::CameraSource;
use yoga_mate::catalog::PoseCatalog;
use yoga_mate::coach::Coach;
use yoga_mate::config::Config;
use yoga_mate::log;
use yoga_mate::logging::Logger;
use yoga_mate::render::MinifbRenderer;
use yoga_mate::session::{timer_text, HoldDuration, SessionOutcome, UiUpdate};
use yoga_mate::speech::SpeechDispatcher;

const CONFIG_PATH: &str = "config.toml";

#[derive(Debug, PartialEq)]
enum Command {
    List,
    Select(String),
    Hold(HoldDuration),
    Cycle,
    Start,
    Stop,
    Quit,
}

fn parse_command(line: &str) -> std::result::Result<Option<Command>, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (line, ""),
    };
    let command = match word {
        "" => return Ok(None),
        "list" | "l" => Command::List,
        "select" | "s" if !rest.is_empty() => Command::Select(rest.to_string()),
        "hold" | "h" => Command::Hold(rest.parse().map_err(|e| format!("{e}"))?),
        "cycle" | "c" => Command::Cycle,
        "start" => Command::Start,
        "stop" => Command::Stop,
        "q" | "quit" => Command::Quit,
        _ => return Err(format!("unknown command: {line}")),
    };
    Ok(Some(command))
}

fn print_help() {
    println!("Commands:");
    println!("  list               - list poses");
    println!("  select <pose>      - choose a pose (e.g. select Tree Pose)");
    println!("  hold <30s|1 min|3 min> - set the hold duration");
    println!("  cycle              - next hold duration");
    println!("  start              - start a session");
    println!("  stop               - stop the session");
    println!("  q                  - quit");
    println!();
}

fn spawn_stdin_reader(tx: mpsc::Sender<String>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
}

fn prompt() {
    print!("> ");
    let _ = io::stdout().flush();
}

fn main() -> Result<()> {
    let logger = Logger::open_or_stderr("logs", "yoga_mate");
    log!(logger, "Yoga Mate ({})", env!("GIT_VERSION"));

    let (config, config_err) = Config::load_or_default(CONFIG_PATH);
    if let Some(e) = config_err {
        log!(logger, "[config] using defaults: {e:#}");
    }

    let (catalog, catalog_err) = PoseCatalog::load_or_empty(&config.catalog.path);
    match catalog_err {
        Some(e) => log!(logger, "[catalog] {e}"),
        None => log!(logger, "[catalog] loaded {} poses", catalog.len()),
    }

    let speech = SpeechDispatcher::from_config(&config.speech, logger.clone());
    let camera_config = config.camera.clone();
    let detector_config = config.detector.clone();
    let (width, height) = (config.camera.width as usize, config.camera.height as usize);
    let mut coach = Coach::new(config, catalog, logger.clone()).with_speech(speech);

    let mut renderer = MinifbRenderer::new("Yoga Mate", width, height)?;

    print_help();
    if let Some(pose) = coach.selected_pose() {
        println!("Selected: {} (hold {}s)", pose, coach.hold_secs());
    }
    prompt();

    let (line_tx, line_rx) = mpsc::channel();
    spawn_stdin_reader(line_tx);

    'main: while renderer.is_open() {
        for line in line_rx.try_iter() {
            match parse_command(&line) {
                Ok(None) => {}
                Ok(Some(Command::Quit)) => break 'main,
                Ok(Some(Command::List)) => {
                    for name in coach.catalog().names() {
                        let marker = if Some(name) == coach.selected_pose() { "*" } else { " " };
                        println!(" {} {}", marker, name);
                    }
                }
                Ok(Some(Command::Select(pose))) => match coach.select_pose(&pose) {
                    Ok(info) => {
                        println!("{}\n\n{}\n{}", pose, info.instructions, info.image_label());
                        renderer.set_title(&format!("Yoga Mate - {}", pose));
                    }
                    Err(e) => println!("{e}"),
                },
                Ok(Some(Command::Hold(duration))) => {
                    coach.set_hold(duration);
                    println!("Hold: {}", timer_text(duration.seconds()));
                }
                Ok(Some(Command::Cycle)) => {
                    let duration = coach.cycle_hold();
                    println!("Hold: {} ({})", timer_text(duration.seconds()), duration);
                }
                Ok(Some(Command::Start)) => {
                    let camera = camera_config.clone();
                    let detector = detector_config.clone();
                    if let Err(e) = coach.start_selected(move || CameraSource::open(&camera, &detector)) {
                        println!("{e}");
                    }
                }
                Ok(Some(Command::Stop)) => coach.stop_session(),
                Err(msg) => println!("{msg}"),
            }
            prompt();
        }

        let mut frame_drawn = false;
        for update in coach.poll_updates() {
            match update {
                UiUpdate::Status(text) => println!("\n{}", text),
                UiUpdate::Timer(text) => renderer.set_title(&format!("Yoga Mate - {}", text)),
                UiUpdate::Frame(frame) => {
                    let canvas = renderer.canvas();
                    if let Some(pixels) = &frame.frame {
                        canvas.draw_frame(pixels);
                    }
                    if let Some(skeleton) = &frame.skeleton {
                        canvas.draw_skeleton(skeleton, frame.verdict.as_ref());
                    }
                    canvas.draw_progress(frame.remaining_secs, frame.required_secs);
                    frame_drawn = true;
                }
                UiUpdate::Ended(outcome) => {
                    if let SessionOutcome::DeviceUnavailable(reason) = &outcome {
                        log!(logger, "[main] session ended: camera unavailable ({reason})");
                    }
                    prompt();
                }
            }
        }

        renderer.update()?;
        if !frame_drawn {
            thread::sleep(Duration::from_millis(16));
        }
    }

    coach.stop_session();
    log!(logger, "Shutting down...");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("  "), Ok(None));
        assert_eq!(parse_command("list"), Ok(Some(Command::List)));
        assert_eq!(
            parse_command("select Tree Pose"),
            Ok(Some(Command::Select("Tree Pose".to_string())))
        );
        assert_eq!(parse_command("hold 1 min"), Ok(Some(Command::Hold(HoldDuration::OneMinute))));
        assert_eq!(parse_command("cycle"), Ok(Some(Command::Cycle)));
        assert_eq!(parse_command("q"), Ok(Some(Command::Quit)));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_command("hold 5 min").is_err());
        assert!(parse_command("select").is_err());
        assert!(parse_command("dance").is_err());
    }
}

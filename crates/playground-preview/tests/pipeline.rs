use playground_core::{CodeState, PreviewConfig};
use playground_preview::{
    AssembledDocument, ConsoleKind, ExecutionHost, ManualClock, PreviewPipeline, RelayEnvelope,
    RelayPort, SandboxPolicy, render_argument,
};
use pretty_assertions::assert_eq;
use std::time::{Duration, Instant};

/// Stand-in for a browser frame: runs `console.<method>(args)` and `throw new Error("..")`
/// statements of the wrapped user script, and relays them the way the injected script would.
#[derive(Default)]
struct FakeSandbox {
    loads: Vec<String>,
}

impl FakeSandbox {
    fn run_statement(statement: &str, line: u32, relay: &RelayPort) -> bool {
        let statement = statement.trim().trim_end_matches(';');
        if let Some(message) = statement
            .strip_prefix("throw new Error(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let message = message.trim_matches(|c| c == '"' || c == '\'');
            relay
                .post(&RelayEnvelope::uncaught(&format!("Uncaught Error: {message}"), line))
                .unwrap();
            return false;
        }

        for kind in [ConsoleKind::Log, ConsoleKind::Warn, ConsoleKind::Error] {
            let prefix = format!("console.{}(", kind.as_method());
            let Some(args) = statement
                .strip_prefix(prefix.as_str())
                .and_then(|rest| rest.strip_suffix(')'))
            else {
                continue;
            };
            let rendered = args.split(',').map(str::trim).filter(|a| !a.is_empty()).map(|arg| {
                match serde_json::from_str::<serde_json::Value>(&arg.replace('\'', "\"")) {
                    Ok(value) => render_argument(&value),
                    Err(_) => arg.to_string(),
                }
            });
            relay.post(&RelayEnvelope::from_args(kind, rendered)).unwrap();
        }
        true
    }
}

impl ExecutionHost for FakeSandbox {
    fn load(&mut self, document: &AssembledDocument, policy: &SandboxPolicy, relay: &RelayPort) {
        assert!(policy.allow_scripts);
        self.loads.push(document.as_str().to_string());

        let wrapped = document.wrapped_script();
        let body = wrapped
            .strip_prefix("try { ")
            .and_then(|rest| rest.split(" } catch (err)").next())
            .unwrap_or_default();
        for (index, statement) in body.lines().enumerate() {
            if !Self::run_statement(statement, index as u32 + 1, relay) {
                break;
            }
        }
    }
}

fn pipeline() -> PreviewPipeline<FakeSandbox, ManualClock> {
    PreviewPipeline::new(
        FakeSandbox::default(),
        ManualClock::new(1_700_000_000_000),
        &PreviewConfig::default(),
    )
}

#[test]
fn test_end_to_end_single_log() {
    let mut pipeline = pipeline();
    let code = CodeState::new(r#"<div id="x"></div>"#, "#x{color:red;}", "console.log(1)");

    let document = pipeline.start(&code);
    assert!(document.as_str().contains(r#"<div id="x"></div>"#));
    assert!(document.as_str().contains("#x{color:red;}"));

    assert_eq!(pipeline.pump(), 1);
    let messages: Vec<_> = pipeline.console().iter().collect();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].kind, ConsoleKind::Log);
    assert_eq!(messages[0].text, "1");
    assert_eq!(messages[0].timestamp, 1_700_000_000_000);
}

#[test]
fn test_mixed_arguments_and_uncaught_error() {
    let mut pipeline = pipeline();
    let code = CodeState::new(
        "",
        "",
        "console.warn('total', {\"n\": 2})\nthrow new Error(\"boom\")\nconsole.log('unreachable')",
    );
    pipeline.start(&code);
    pipeline.pump();

    let messages: Vec<_> = pipeline
        .console()
        .iter()
        .map(|m| (m.kind, m.text.as_str()))
        .collect();
    assert_eq!(
        messages,
        vec![
            (ConsoleKind::Warn, "total {\"n\":2}"),
            (ConsoleKind::Error, "Uncaught Error: boom (L2)"),
        ]
    );
    assert!(pipeline.console().has_errors());
}

#[test]
fn test_bounded_log_keeps_latest_fifty() {
    let mut pipeline = pipeline();
    pipeline.start(&CodeState::default());

    for i in 0..60 {
        pipeline
            .port()
            .post(&RelayEnvelope::new(ConsoleKind::Log, i.to_string()))
            .unwrap();
    }
    assert_eq!(pipeline.pump(), 60);

    let texts: Vec<String> = pipeline.console().iter().map(|m| m.text.clone()).collect();
    let expected: Vec<String> = (10..60).map(|i| i.to_string()).collect();
    assert_eq!(texts, expected);
}

#[test]
fn test_debounce_collapses_burst() {
    let mut pipeline = pipeline();
    let start = Instant::now();
    let mut code = CodeState::default();

    for (i, ms) in [0u64, 100, 250, 400, 590].into_iter().enumerate() {
        code.js = format!("console.log({i})");
        pipeline.schedule(start + Duration::from_millis(ms));
        assert!(
            pipeline
                .poll(start + Duration::from_millis(ms), &code)
                .is_none()
        );
    }

    assert!(pipeline.poll(start + Duration::from_millis(1000), &code).is_none());
    let document = pipeline
        .poll(start + Duration::from_millis(1190), &code)
        .unwrap();
    assert!(document.as_str().contains("console.log(4)"));
    assert!(pipeline.poll(start + Duration::from_secs(5), &code).is_none());

    assert_eq!(pipeline.assembly_count(), 1);
    assert_eq!(pipeline.host().loads.len(), 1);
    pipeline.pump();
    assert_eq!(pipeline.console().iter().next().unwrap().text, "4");
}

#[test]
fn test_reassembly_clears_console() {
    let mut pipeline = pipeline();
    pipeline.start(&CodeState::new("", "", "console.log('a')"));
    pipeline.pump();
    assert_eq!(pipeline.console().len(), 1);

    // messages of the old document that were never pumped are dropped as well
    pipeline
        .port()
        .post(&RelayEnvelope::new(ConsoleKind::Log, "late"))
        .unwrap();
    pipeline.assemble_now(&CodeState::new("", "", "console.error('b')"));
    pipeline.pump();

    let texts: Vec<_> = pipeline.console().iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, vec!["b"]);
    assert_eq!(pipeline.assembly_count(), 2);
}

#[test]
fn test_manual_clear_and_capacity_from_config() {
    let config = PreviewConfig {
        debounce_ms: 10,
        console_capacity: 3,
    };
    let mut pipeline = PreviewPipeline::new(FakeSandbox::default(), ManualClock::new(0), &config);
    pipeline.start(&CodeState::new(
        "",
        "",
        "console.log(1)\nconsole.log(2)\nconsole.log(3)\nconsole.log(4)",
    ));
    pipeline.pump();
    assert_eq!(pipeline.console().len(), 3);
    assert_eq!(pipeline.console().capacity(), 3);

    pipeline.clear_log();
    assert!(pipeline.console().is_empty());
}

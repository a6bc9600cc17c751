use batch_task_runner::error::{AppError, ResourceInitError, TaskError};
use batch_task_runner::infrastructure::{ChatEngine, ChatEngineFactory, ResourceFactory, SpeechEngine};
use batch_task_runner::utils::logging;
use batch_task_runner::{App, Config, Message, Role};
use std::io::Cursor;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// 固定回复的对话引擎，遇到指定内容时失败
struct EchoEngine {
    reply: String,
    fail_on: Option<String>,
}

impl ChatEngine for EchoEngine {
    async fn complete(&self, messages: &[Message]) -> anyhow::Result<String> {
        let last = messages.last().map(|m| m.content.as_str()).unwrap_or_default();
        if self.fail_on.as_deref() == Some(last) {
            anyhow::bail!("推理服务返回 500");
        }
        Ok(self.reply.clone())
    }
}

struct EchoFactory {
    builds: Arc<AtomicUsize>,
    releases: Arc<AtomicUsize>,
    fail_on: Option<String>,
    init_fails: bool,
}

impl EchoFactory {
    fn new(builds: Arc<AtomicUsize>) -> Self {
        Self {
            builds,
            releases: Arc::new(AtomicUsize::new(0)),
            fail_on: None,
            init_fails: false,
        }
    }
}

impl ResourceFactory for EchoFactory {
    type Resource = EchoEngine;

    fn name(&self) -> &str {
        "echo"
    }

    async fn build(&self) -> Result<EchoEngine, ResourceInitError> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        if self.init_fails {
            return Err(ResourceInitError::new("chat_model", "模型未部署"));
        }
        Ok(EchoEngine {
            reply: "hello".to_string(),
            fail_on: self.fail_on.clone(),
        })
    }

    fn release(&self, _engine: EchoEngine) {
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}

fn test_config(dir: &Path, input: &str) -> Config {
    let input_file = dir.join("input.json");
    std::fs::write(&input_file, input).unwrap();
    Config {
        input_file: input_file.display().to_string(),
        output_dir: dir.join("outputs").display().to_string(),
        ..Config::default()
    }
}

fn output_files(dir: &Path) -> Vec<std::path::PathBuf> {
    let mut files: Vec<_> = std::fs::read_dir(dir.join("outputs"))
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    files.sort();
    files
}

#[tokio::test]
async fn test_chat_end_to_end() {
    logging::init(false);
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(
        dir.path(),
        r#"[{"task_id":"t1","messages":[{"role":"user","content":"hi"}]}]"#,
    );

    let builds = Arc::new(AtomicUsize::new(0));
    let app = App::initialize(config).await;
    let summary = app.run_chat_with(EchoFactory::new(builds.clone())).await.unwrap();

    assert_eq!(builds.load(Ordering::SeqCst), 1);
    assert_eq!(summary.succeeded(), 1);
    assert_eq!(summary.report.entries.len(), 1);
    assert_eq!(summary.report.entries[0].task_id, "t1");
    assert_eq!(summary.report.entries[0].percent, 100.0);

    let files = output_files(dir.path());
    assert_eq!(files.len(), 1);
    let name = files[0].file_name().unwrap().to_string_lossy().to_string();
    assert!(name.ends_with("_task_t1.txt"), "文件名: {}", name);

    let content = std::fs::read_to_string(&files[0]).unwrap();
    let (_, json) = content.split_once("=== JSON FORMAT ===\n").unwrap();
    let messages: Vec<Message> = serde_json::from_str(json).unwrap();
    assert_eq!(
        messages,
        vec![
            Message::new(Role::User, "hi"),
            Message::new(Role::Assistant, "hello"),
        ]
    );
}

#[tokio::test]
async fn test_chat_failing_task_is_isolated() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(
        dir.path(),
        r#"[
            {"task_id":"a","messages":[{"role":"user","content":"ok"}]},
            {"task_id":"b","messages":[{"role":"user","content":"boom"}]},
            {"task_id":"c","messages":[{"role":"user","content":"ok"}]}
        ]"#,
    );

    let factory = EchoFactory {
        fail_on: Some("boom".to_string()),
        ..EchoFactory::new(Arc::new(AtomicUsize::new(0)))
    };
    let summary = App::initialize(config).await.run_chat_with(factory).await.unwrap();

    let ids: Vec<&str> = summary
        .outcomes
        .iter()
        .map(|o| o.timing.task_id.as_str())
        .collect();
    assert_eq!(summary.timings().len(), 3);
    assert_eq!(ids, vec!["a", "b", "c"]);
    assert_eq!(summary.failed(), 1);
    match &summary.outcomes[1].result {
        Err(TaskError::Invoke { task_id, .. }) => assert_eq!(task_id, "b"),
        other => panic!("意外的结果: {:?}", other),
    }

    let files = output_files(dir.path());
    assert_eq!(files.len(), 2);
    assert!(files.iter().all(|f| !f.to_string_lossy().ends_with("_task_b.txt")));
}

#[tokio::test]
async fn test_chat_engine_released_after_batch() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(
        dir.path(),
        r#"[
            {"task_id":"a","messages":[{"role":"user","content":"ok"}]},
            {"task_id":"b","messages":[{"role":"user","content":"boom"}]}
        ]"#,
    );

    let builds = Arc::new(AtomicUsize::new(0));
    let factory = EchoFactory {
        fail_on: Some("boom".to_string()),
        ..EchoFactory::new(builds.clone())
    };
    let releases = factory.releases.clone();
    let summary = App::initialize(config).await.run_chat_with(factory).await.unwrap();

    assert_eq!(summary.outcomes.len(), 2);
    assert_eq!(builds.load(Ordering::SeqCst), 1);
    assert_eq!(releases.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_chat_missing_input_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        input_file: dir.path().join("nope.json").display().to_string(),
        output_dir: dir.path().join("outputs").display().to_string(),
        ..Config::default()
    };

    let builds = Arc::new(AtomicUsize::new(0));
    let err = App::initialize(config)
        .await
        .run_chat_with(EchoFactory::new(builds.clone()))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Load(_)));
    // 输入加载失败时不初始化引擎
    assert_eq!(builds.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_chat_resource_init_failure_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(
        dir.path(),
        r#"[{"task_id":"t1","messages":[{"role":"user","content":"hi"}]}]"#,
    );

    let factory = EchoFactory {
        init_fails: true,
        ..EchoFactory::new(Arc::new(AtomicUsize::new(0)))
    };
    let err = App::initialize(config).await.run_chat_with(factory).await.unwrap_err();

    match err {
        AppError::ResourceInit(e) => assert_eq!(e.resource, "chat_model"),
        other => panic!("意外的错误: {:?}", other),
    }
    assert!(output_files(dir.path()).is_empty());
}

#[tokio::test]
async fn test_chat_empty_task_list_skips_init() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path(), "[]");

    let builds = Arc::new(AtomicUsize::new(0));
    let summary = App::initialize(config)
        .await
        .run_chat_with(EchoFactory::new(builds.clone()))
        .await
        .unwrap();

    assert_eq!(builds.load(Ordering::SeqCst), 0);
    assert!(summary.outcomes.is_empty());
    assert_eq!(summary.report.total_secs, 0.0);
}

/// 返回固定 WAV 的语音引擎
struct ToneEngine;

impl SpeechEngine for ToneEngine {
    async fn synthesize(&self, text: &str) -> anyhow::Result<Vec<u8>> {
        if text.is_empty() {
            anyhow::bail!("文本为空");
        }
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 16000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut buf = Cursor::new(Vec::new());
        {
            let mut w = hound::WavWriter::new(&mut buf, spec)?;
            for s in [0i16, 4096, -8192, 2048] {
                w.write_sample(s)?;
            }
            w.finalize()?;
        }
        Ok(buf.into_inner())
    }
}

struct ToneFactory;

impl ResourceFactory for ToneFactory {
    type Resource = ToneEngine;

    fn name(&self) -> &str {
        "tone"
    }

    async fn build(&self) -> Result<ToneEngine, ResourceInitError> {
        Ok(ToneEngine)
    }
}

#[tokio::test]
async fn test_speech_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("popis.csv");
    std::fs::write(&csv, "id;tekst\n1;Dobar dan\n2;\n3\n").unwrap();

    let config = Config {
        speech_input_file: csv.display().to_string(),
        output_dir: dir.path().join("outputs").display().to_string(),
        ..Config::default()
    };

    let summary = App::initialize(config)
        .await
        .run_speech_with(ToneFactory)
        .await
        .unwrap();

    // 第 3 行列数不足被跳过，第 2 行文本为空导致合成失败
    assert_eq!(summary.outcomes.len(), 2);
    assert_eq!(summary.succeeded(), 1);

    let files = output_files(dir.path());
    assert_eq!(files.len(), 1);
    let name = files[0].file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("1_") && name.ends_with(".wav"));

    let mut reader = hound::WavReader::open(&files[0]).unwrap();
    let peak = reader
        .samples::<i16>()
        .map(|s| s.unwrap().unsigned_abs())
        .max()
        .unwrap();
    assert_eq!(peak, 32768);
}

#[tokio::test]
#[ignore] // 默认忽略，需要可用的推理后端：cargo test -- --ignored
async fn test_live_chat_backend() {
    logging::init(true);

    let config = Config::from_env();
    let ctx = batch_task_runner::ResourceContext::new(ChatEngineFactory::new(&config));

    let engine = ctx.get().await.expect("引擎初始化失败");
    let reply = engine
        .complete(&[Message::new(Role::User, "用一个词回答：1+1=?")])
        .await
        .expect("LLM 调用失败");

    println!("LLM 回复: {}", reply);
    assert!(!reply.is_empty());
}

#[tokio::test]
#[ignore]
async fn test_live_diagnose() {
    logging::init(false);

    let config = Config::from_env();
    let report = App::initialize(config).await.diagnose().await;
    assert!(report.reachable(), "推理后端不可达");
}

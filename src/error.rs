use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 应用程序错误类型
///
/// 顶层错误只有两类去向：
/// - 致命错误（加载、资源初始化、配置）直接终止批处理
/// - 任务错误在任务循环内部被隔离，不会传到这里以外
#[derive(Debug, Error)]
pub enum AppError {
    /// 任务文件加载错误
    #[error("加载错误: {0}")]
    Load(#[from] LoadError),
    /// 资源初始化错误
    #[error("资源初始化错误: {0}")]
    ResourceInit(#[from] ResourceInitError),
    /// 单个任务错误
    #[error("任务错误: {0}")]
    Task(#[from] TaskError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 任务文件加载错误
#[derive(Debug, Error)]
pub enum LoadError {
    /// 文件不存在或不可读
    #[error("输入文件不存在: {path}")]
    NotFound { path: String },
    /// 内容不是合法的结构化数据
    #[error("输入文件格式无效 ({path}): {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    /// 结构合法但缺少必需字段
    #[error("输入文件结构错误 ({path}): {reason}")]
    Malformed { path: String, reason: String },
    /// 其他读取失败
    #[error("读取输入文件失败 ({path}): {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 资源初始化错误
///
/// `resource` 指出具体是哪个子资源失败（客户端、模型、音色……）
#[derive(Debug, Error)]
#[error("子资源 `{resource}` 初始化失败: {source}")]
pub struct ResourceInitError {
    pub resource: String,
    #[source]
    pub source: BoxError,
}

/// 单个任务错误
#[derive(Debug, Error)]
pub enum TaskError {
    /// 调用推理引擎失败
    #[error("[任务 {task_id}] 推理调用失败: {source}")]
    Invoke {
        task_id: String,
        #[source]
        source: BoxError,
    },
    /// 推理引擎返回空内容
    #[error("[任务 {task_id}] 推理返回内容为空")]
    EmptyResponse { task_id: String },
    /// 超时
    #[error("[任务 {task_id}] 超过 {seconds} 秒未完成")]
    Timeout { task_id: String, seconds: u64 },
    /// 写入结果失败
    #[error("[任务 {task_id}] 写入结果失败 ({path}): {source}")]
    Persist {
        task_id: String,
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件读取失败
    #[error("无法读取配置文件 {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 配置文件解析失败
    #[error("无法解析配置文件 {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

// ========== 便捷构造函数 ==========

impl ResourceInitError {
    /// 创建子资源初始化错误
    pub fn new(resource: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            resource: resource.into(),
            source: source.into(),
        }
    }
}

impl TaskError {
    /// 创建推理调用错误
    pub fn invoke(task_id: impl Into<String>, source: impl Into<BoxError>) -> Self {
        TaskError::Invoke {
            task_id: task_id.into(),
            source: source.into(),
        }
    }

    /// 创建写入错误
    pub fn persist(
        task_id: impl Into<String>,
        path: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        TaskError::Persist {
            task_id: task_id.into(),
            path: path.into(),
            source,
        }
    }

    /// 出错任务的ID
    pub fn task_id(&self) -> &str {
        match self {
            TaskError::Invoke { task_id, .. }
            | TaskError::EmptyResponse { task_id }
            | TaskError::Timeout { task_id, .. }
            | TaskError::Persist { task_id, .. } => task_id,
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

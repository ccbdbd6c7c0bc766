use crate::utils::error::{Result, TaskError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{mpsc, Mutex as AsyncMutex};
use tokio::task::{Id, JoinSet};
use tokio_util::sync::CancellationToken;

pub const DEFAULT_BUFFER_SIZE: usize = 16;

/// 具名 channel 的讀取端，可被多個消費者共用
#[derive(Debug, Clone)]
pub struct ChannelReader {
    name: String,
    rx: Arc<AsyncMutex<mpsc::Receiver<String>>>,
}

impl ChannelReader {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// channel 關閉且已讀完時回傳 `None`
    pub async fn recv(&self) -> Option<String> {
        self.rx.lock().await.recv().await
    }

    /// 取消時同樣回傳 `None`
    pub async fn recv_or_cancel(&self, cancel: &CancellationToken) -> Option<String> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            item = self.recv() => item,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChannelWriter {
    name: String,
    tx: mpsc::Sender<String>,
}

impl ChannelWriter {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn send(&self, data: String) -> Result<()> {
        self.tx
            .send(data)
            .await
            .map_err(|_| TaskError::ChannelClosed {
                name: self.name.clone(),
            })
    }

    /// 緩衝區滿時等待；被取消則回傳 `Ok(false)`
    pub async fn send_or_cancel(&self, data: String, cancel: &CancellationToken) -> Result<bool> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Ok(false),
            sent = self.send(data) => sent.map(|_| true),
        }
    }
}

/// 1 → 1 轉換
#[async_trait]
pub trait Decorator: Send + Sync {
    async fn decorate(
        &self,
        cancel: CancellationToken,
        input: ChannelReader,
        output: ChannelWriter,
    ) -> Result<()>;
}

/// N → 1 合併
#[async_trait]
pub trait Multiplexer: Send + Sync {
    async fn multiplex(
        &self,
        cancel: CancellationToken,
        inputs: Vec<ChannelReader>,
        output: ChannelWriter,
    ) -> Result<()>;
}

/// 1 → N 分流
#[async_trait]
pub trait Separator: Send + Sync {
    async fn separate(
        &self,
        cancel: CancellationToken,
        input: ChannelReader,
        outputs: Vec<ChannelWriter>,
    ) -> Result<()>;
}

struct Channel {
    // None 代表 conveyor 端已關閉；stage 手上的 writer 仍可寫到結束為止
    tx: Option<mpsc::Sender<String>>,
    rx: Arc<AsyncMutex<mpsc::Receiver<String>>>,
}

enum Stage {
    Decorator {
        handler: Arc<dyn Decorator>,
        input: String,
        output: String,
    },
    Multiplexer {
        handler: Arc<dyn Multiplexer>,
        inputs: Vec<String>,
        output: String,
    },
    Separator {
        handler: Arc<dyn Separator>,
        input: String,
        outputs: Vec<String>,
    },
}

impl Stage {
    fn label(&self) -> String {
        match self {
            Stage::Decorator { input, output, .. } => {
                format!("decorator({} -> {})", input, output)
            }
            Stage::Multiplexer { inputs, output, .. } => {
                format!("multiplexer([{}] -> {})", inputs.join(", "), output)
            }
            Stage::Separator { input, outputs, .. } => {
                format!("separator({} -> [{}])", input, outputs.join(", "))
            }
        }
    }
}

/// 已解析好 channel 的 stage，可直接丟進 task 執行
enum BoundStage {
    Decorator(Arc<dyn Decorator>, ChannelReader, ChannelWriter),
    Multiplexer(Arc<dyn Multiplexer>, Vec<ChannelReader>, ChannelWriter),
    Separator(Arc<dyn Separator>, ChannelReader, Vec<ChannelWriter>),
}

impl BoundStage {
    async fn run(self, cancel: CancellationToken) -> Result<()> {
        match self {
            BoundStage::Decorator(handler, input, output) => {
                handler.decorate(cancel, input, output).await
            }
            BoundStage::Multiplexer(handler, inputs, output) => {
                handler.multiplex(cancel, inputs, output).await
            }
            BoundStage::Separator(handler, input, outputs) => {
                handler.separate(cancel, input, outputs).await
            }
        }
    }
}

/// 以名稱串接 channel 的輸送帶：先註冊 stage，再一次全部並行執行
pub struct Conveyor {
    size: usize,
    channels: Mutex<HashMap<String, Channel>>,
    stages: Mutex<Vec<Stage>>,
    shutdown: CancellationToken,
}

impl Conveyor {
    pub fn new(size: usize) -> Self {
        Self {
            size: size.max(1),
            channels: Mutex::new(HashMap::new()),
            stages: Mutex::new(Vec::new()),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn buffer_size(&self) -> usize {
        self.size
    }

    fn lock_channels(&self) -> MutexGuard<'_, HashMap<String, Channel>> {
        self.channels.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_stages(&self) -> MutexGuard<'_, Vec<Stage>> {
        self.stages.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn ensure_channel(&self, name: &str) {
        let mut channels = self.lock_channels();
        if !channels.contains_key(name) {
            let (tx, rx) = mpsc::channel(self.size);
            channels.insert(
                name.to_string(),
                Channel {
                    tx: Some(tx),
                    rx: Arc::new(AsyncMutex::new(rx)),
                },
            );
            tracing::debug!("Created channel '{}' (buffer {})", name, self.size);
        }
    }

    pub fn has_channel(&self, name: &str) -> bool {
        self.lock_channels().contains_key(name)
    }

    pub fn register_decorator<D>(&self, handler: D, input: &str, output: &str)
    where
        D: Decorator + 'static,
    {
        self.ensure_channel(input);
        self.ensure_channel(output);
        self.lock_stages().push(Stage::Decorator {
            handler: Arc::new(handler),
            input: input.to_string(),
            output: output.to_string(),
        });
    }

    pub fn register_multiplexer<M>(&self, handler: M, inputs: &[&str], output: &str)
    where
        M: Multiplexer + 'static,
    {
        for input in inputs {
            self.ensure_channel(input);
        }
        self.ensure_channel(output);
        self.lock_stages().push(Stage::Multiplexer {
            handler: Arc::new(handler),
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            output: output.to_string(),
        });
    }

    pub fn register_separator<S>(&self, handler: S, input: &str, outputs: &[&str])
    where
        S: Separator + 'static,
    {
        self.ensure_channel(input);
        for output in outputs {
            self.ensure_channel(output);
        }
        self.lock_stages().push(Stage::Separator {
            handler: Arc::new(handler),
            input: input.to_string(),
            outputs: outputs.iter().map(|s| s.to_string()).collect(),
        });
    }

    fn reader(&self, name: &str) -> Result<ChannelReader> {
        let channels = self.lock_channels();
        let channel = channels
            .get(name)
            .ok_or_else(|| TaskError::ChannelNotFound {
                name: name.to_string(),
            })?;
        Ok(ChannelReader {
            name: name.to_string(),
            rx: Arc::clone(&channel.rx),
        })
    }

    fn writer(&self, name: &str) -> Result<ChannelWriter> {
        let channels = self.lock_channels();
        let channel = channels
            .get(name)
            .ok_or_else(|| TaskError::ChannelNotFound {
                name: name.to_string(),
            })?;
        let tx = channel.tx.clone().ok_or_else(|| TaskError::ChannelClosed {
            name: name.to_string(),
        })?;
        Ok(ChannelWriter {
            name: name.to_string(),
            tx,
        })
    }

    fn bind(&self, stage: Stage) -> Result<BoundStage> {
        Ok(match stage {
            Stage::Decorator {
                handler,
                input,
                output,
            } => BoundStage::Decorator(handler, self.reader(&input)?, self.writer(&output)?),
            Stage::Multiplexer {
                handler,
                inputs,
                output,
            } => BoundStage::Multiplexer(
                handler,
                inputs
                    .iter()
                    .map(|name| self.reader(name))
                    .collect::<Result<Vec<_>>>()?,
                self.writer(&output)?,
            ),
            Stage::Separator {
                handler,
                input,
                outputs,
            } => BoundStage::Separator(
                handler,
                self.reader(&input)?,
                outputs
                    .iter()
                    .map(|name| self.writer(name))
                    .collect::<Result<Vec<_>>>()?,
            ),
        })
    }

    /// 每個 stage 一個 task；第一個錯誤會取消其餘 stage 並被回傳。
    /// 結束時關閉所有 channel，緩衝中的資料仍可 `recv`。
    pub async fn run(&self, cancel: CancellationToken) -> Result<()> {
        let stages = std::mem::take(&mut *self.lock_stages());
        let token = cancel.child_token();

        let mut bound = Vec::with_capacity(stages.len());
        for stage in stages {
            let label = stage.label();
            match self.bind(stage) {
                Ok(stage) => bound.push((label, stage)),
                Err(e) => {
                    tracing::error!("❌ Could not start {}: {}", label, e);
                    self.close_all();
                    return Err(e);
                }
            }
        }

        tracing::info!("🚀 Running conveyor with {} stages", bound.len());

        let mut set = JoinSet::new();
        let mut labels: HashMap<Id, String> = HashMap::new();
        for (label, stage) in bound {
            let token = token.clone();
            let handle = set.spawn(stage.run(token));
            labels.insert(handle.id(), label);
        }

        let mut first_error: Option<TaskError> = None;
        while let Some(joined) = set.join_next_with_id().await {
            let failure = match joined {
                Ok((id, Ok(()))) => {
                    tracing::debug!("Stage {} finished", stage_label(&labels, id));
                    None
                }
                Ok((id, Err(e))) => {
                    tracing::warn!("Stage {} failed: {}", stage_label(&labels, id), e);
                    Some(e)
                }
                Err(join_error) => {
                    let stage = stage_label(&labels, join_error.id()).to_string();
                    tracing::warn!("Stage {} aborted: {}", stage, join_error);
                    Some(TaskError::StageFailed {
                        stage,
                        details: join_error.to_string(),
                    })
                }
            };

            if let Some(e) = failure {
                if first_error.is_none() {
                    token.cancel();
                    first_error = Some(e);
                }
            }
        }

        self.close_all();

        match first_error {
            Some(e) => {
                tracing::error!("❌ Conveyor stopped: {}", e);
                Err(e)
            }
            None => {
                tracing::info!("✅ Conveyor finished");
                Ok(())
            }
        }
    }

    /// 寫入指定 channel；緩衝區滿時等待，conveyor 關閉時回傳 `ChannelClosed`
    pub async fn send(&self, name: &str, data: impl Into<String>) -> Result<()> {
        let writer = self.writer(name)?;
        tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => Err(TaskError::ChannelClosed {
                name: name.to_string(),
            }),
            sent = writer.send(data.into()) => sent,
        }
    }

    /// 讀取指定 channel；關閉且已讀完時回傳 `None`
    pub async fn recv(&self, name: &str) -> Result<Option<String>> {
        let reader = self.reader(name)?;
        Ok(reader.recv().await)
    }

    /// 放掉 conveyor 持有的寫入端，stage 寫完後 channel 即關閉
    pub fn close(&self, name: &str) -> Result<()> {
        let mut channels = self.lock_channels();
        let channel = channels
            .get_mut(name)
            .ok_or_else(|| TaskError::ChannelNotFound {
                name: name.to_string(),
            })?;
        channel.tx = None;
        Ok(())
    }

    pub fn close_all(&self) {
        self.shutdown.cancel();
        for channel in self.lock_channels().values_mut() {
            channel.tx = None;
        }
    }
}

fn stage_label(labels: &HashMap<Id, String>, id: Id) -> &str {
    labels.get(&id).map(String::as_str).unwrap_or("unknown")
}

impl Default for Conveyor {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_SIZE)
    }
}

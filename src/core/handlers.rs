use crate::core::conveyor::{
    ChannelReader, ChannelWriter, Conveyor, Decorator, Multiplexer, Separator,
};
use crate::utils::error::{Result, TaskError};
use async_trait::async_trait;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

pub const DECORATED_PREFIX: &str = "decorated: ";
pub const NO_DECORATOR_MARKER: &str = "no decorator";
pub const NO_MULTIPLEXER_MARKER: &str = "no multiplexer";

/// 幫每筆資料加上前綴；含有拒絕標記的資料會讓整條輸送帶停下
#[derive(Debug, Clone)]
pub struct PrefixDecorator {
    pub prefix: String,
    pub reject_marker: String,
}

impl Default for PrefixDecorator {
    fn default() -> Self {
        Self {
            prefix: DECORATED_PREFIX.to_string(),
            reject_marker: NO_DECORATOR_MARKER.to_string(),
        }
    }
}

impl PrefixDecorator {
    pub fn apply(&self, item: String) -> Result<String> {
        if item.contains(&self.reject_marker) {
            return Err(TaskError::CannotDecorate { data: item });
        }
        if item.starts_with(&self.prefix) {
            Ok(item)
        } else {
            Ok(format!("{}{}", self.prefix, item))
        }
    }
}

#[async_trait]
impl Decorator for PrefixDecorator {
    async fn decorate(
        &self,
        cancel: CancellationToken,
        input: ChannelReader,
        output: ChannelWriter,
    ) -> Result<()> {
        while let Some(item) = input.recv_or_cancel(&cancel).await {
            let decorated = self.apply(item)?;
            if !output.send_or_cancel(decorated, &cancel).await? {
                break;
            }
        }
        Ok(())
    }
}

/// 把所有輸入合併到一個輸出，過濾掉帶有標記的資料
#[derive(Debug, Clone)]
pub struct FilterMultiplexer {
    pub drop_marker: String,
}

impl Default for FilterMultiplexer {
    fn default() -> Self {
        Self {
            drop_marker: NO_MULTIPLEXER_MARKER.to_string(),
        }
    }
}

async fn forward_filtered(
    input: ChannelReader,
    output: ChannelWriter,
    drop_marker: String,
    cancel: CancellationToken,
) -> Result<()> {
    while let Some(item) = input.recv_or_cancel(&cancel).await {
        if item.contains(&drop_marker) {
            tracing::debug!("Dropping '{}' from {}", item, input.name());
            continue;
        }
        if !output.send_or_cancel(item, &cancel).await? {
            break;
        }
    }
    Ok(())
}

#[async_trait]
impl Multiplexer for FilterMultiplexer {
    async fn multiplex(
        &self,
        cancel: CancellationToken,
        inputs: Vec<ChannelReader>,
        output: ChannelWriter,
    ) -> Result<()> {
        let mut set = JoinSet::new();
        for input in inputs {
            set.spawn(forward_filtered(
                input,
                output.clone(),
                self.drop_marker.clone(),
                cancel.clone(),
            ));
        }
        // 只留各轉發 task 手上的寫入端
        drop(output);

        while let Some(joined) = set.join_next().await {
            joined.map_err(|e| TaskError::StageFailed {
                stage: "multiplexer".to_string(),
                details: e.to_string(),
            })??;
        }
        Ok(())
    }
}

/// 依序輪流分配到各個輸出
#[derive(Debug, Clone, Default)]
pub struct RoundRobinSeparator;

#[async_trait]
impl Separator for RoundRobinSeparator {
    async fn separate(
        &self,
        cancel: CancellationToken,
        input: ChannelReader,
        outputs: Vec<ChannelWriter>,
    ) -> Result<()> {
        if outputs.is_empty() {
            return Err(TaskError::StageFailed {
                stage: format!("separator({})", input.name()),
                details: "no outputs registered".to_string(),
            });
        }

        let mut next = 0usize;
        while let Some(item) = input.recv_or_cancel(&cancel).await {
            if !outputs[next].send_or_cancel(item, &cancel).await? {
                break;
            }
            next = (next + 1) % outputs.len();
        }
        Ok(())
    }
}

pub const DEMO_INPUT: &str = "input";
pub const DEMO_DECORATED: &str = "decorated";
pub const DEMO_LEFT: &str = "left";
pub const DEMO_RIGHT: &str = "right";
pub const DEMO_OUTPUT: &str = "output";

/// input → decorator → separator → (left, right) → multiplexer → output
pub fn demo_conveyor(size: usize) -> Conveyor {
    let conveyor = Conveyor::new(size);
    conveyor.register_decorator(PrefixDecorator::default(), DEMO_INPUT, DEMO_DECORATED);
    conveyor.register_separator(
        RoundRobinSeparator,
        DEMO_DECORATED,
        &[DEMO_LEFT, DEMO_RIGHT],
    );
    conveyor.register_multiplexer(
        FilterMultiplexer::default(),
        &[DEMO_LEFT, DEMO_RIGHT],
        DEMO_OUTPUT,
    );
    conveyor
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_prefix_decorator_apply() {
        let decorator = PrefixDecorator::default();
        assert_eq!(decorator.apply("x".to_string()).unwrap(), "decorated: x");
        assert_eq!(
            decorator.apply("decorated: x".to_string()).unwrap(),
            "decorated: x"
        );
        let err = decorator
            .apply("please no decorator here".to_string())
            .unwrap_err();
        assert!(matches!(err, TaskError::CannotDecorate { .. }));
        assert!(err.to_string().starts_with("can't be decorated"));
    }

    #[tokio::test]
    async fn test_separator_round_robin() {
        let conveyor = Arc::new(Conveyor::new(8));
        conveyor.register_separator(RoundRobinSeparator, "in", &["a", "b", "c"]);

        let runner = {
            let conveyor = Arc::clone(&conveyor);
            tokio::spawn(async move { conveyor.run(CancellationToken::new()).await })
        };

        for i in 0..5 {
            conveyor.send("in", i.to_string()).await.unwrap();
        }
        conveyor.close_all();
        runner.await.unwrap().unwrap();

        let mut drained = Vec::new();
        for name in ["a", "b", "c"] {
            let mut items = Vec::new();
            while let Some(item) = conveyor.recv(name).await.unwrap() {
                items.push(item);
            }
            drained.push(items);
        }
        assert_eq!(drained, vec![vec!["0", "3"], vec!["1", "4"], vec!["2"]]);
    }

    #[tokio::test]
    async fn test_multiplexer_filters_and_merges() {
        let conveyor = Arc::new(Conveyor::new(8));
        conveyor.register_multiplexer(FilterMultiplexer::default(), &["x", "y"], "out");

        let runner = {
            let conveyor = Arc::clone(&conveyor);
            tokio::spawn(async move { conveyor.run(CancellationToken::new()).await })
        };

        conveyor.send("x", "one").await.unwrap();
        conveyor.send("y", "two").await.unwrap();
        conveyor.send("y", "no multiplexer please").await.unwrap();
        conveyor.close_all();
        runner.await.unwrap().unwrap();

        let mut items = Vec::new();
        while let Some(item) = conveyor.recv("out").await.unwrap() {
            items.push(item);
        }
        items.sort();
        assert_eq!(items, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn test_separator_without_outputs_fails() {
        let conveyor = Conveyor::new(1);
        conveyor.register_separator(RoundRobinSeparator, "in", &[]);
        let result = tokio::time::timeout(
            Duration::from_secs(5),
            conveyor.run(CancellationToken::new()),
        )
        .await
        .unwrap();
        assert!(matches!(result, Err(TaskError::StageFailed { .. })));
    }
}

//! 界面线程调度
//!
//! 用户信息在后台任务中获取,终态回调必须回到宿主的界面线程交付。
//! 宿主通过 [`UiExecutor`] 告诉适配器如何把回调投递到界面线程。

use tokio::sync::mpsc;

/// 投递到界面线程的任务
pub type UiTask = Box<dyn FnOnce() + Send + 'static>;

/// 界面线程执行器
pub trait UiExecutor: Send + Sync {
    fn post(&self, task: UiTask);
}

/// 在调用线程上立即执行
///
/// 适用于没有独立界面线程的宿主 (命令行、服务端)
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineExecutor;

impl UiExecutor for InlineExecutor {
    fn post(&self, task: UiTask) {
        task();
    }
}

/// 基于通道的执行器
///
/// 任务排队到 [`UiLoop`],由宿主在界面线程上取出执行
#[derive(Debug, Clone)]
pub struct ChannelExecutor {
    tx: mpsc::UnboundedSender<UiTask>,
}

/// 界面线程的任务队列
pub struct UiLoop {
    rx: mpsc::UnboundedReceiver<UiTask>,
}

/// 创建一对通道执行器与任务队列
pub fn ui_channel() -> (ChannelExecutor, UiLoop) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ChannelExecutor { tx }, UiLoop { rx })
}

impl UiExecutor for ChannelExecutor {
    fn post(&self, task: UiTask) {
        if self.tx.send(task).is_err() {
            tracing::warn!("界面任务队列已关闭,回调被丢弃");
        }
    }
}

impl UiLoop {
    /// 执行当前已排队的全部任务,返回执行数量
    pub fn run_pending(&mut self) -> usize {
        let mut count = 0;
        while let Ok(task) = self.rx.try_recv() {
            task();
            count += 1;
        }
        count
    }

    /// 等待并执行下一个任务
    ///
    /// 所有执行器都已释放时返回 `false`
    pub async fn run_next(&mut self) -> bool {
        match self.rx.recv().await {
            Some(task) => {
                task();
                true
            }
            None => false,
        }
    }
}

use super::optimizer::ProgressCallback;
use crate::types::GenerationSummary;

pub struct ConsoleProgressCallback;

impl ProgressCallback for ConsoleProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        println!("-- Population {}", generation);
    }

    fn on_generation_complete(&mut self, summary: &GenerationSummary) {
        match summary.best_fitness {
            Some(best) => println!(
                "-- Fittest {:.0} / mean {:.0} ({} of {} valid)",
                best, summary.mean_fitness, summary.valid_count, summary.size
            ),
            None => println!("-- No fitness recorded"),
        }
    }
}

/// Forwards progress to another thread
pub struct ChannelProgressCallback {
    sender: std::sync::mpsc::Sender<ProgressMessage>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressMessage {
    GenerationStart(usize),
    GenerationComplete(GenerationSummary),
}

impl ChannelProgressCallback {
    pub fn new(sender: std::sync::mpsc::Sender<ProgressMessage>) -> Self {
        Self { sender }
    }
}

impl ProgressCallback for ChannelProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        let _ = self.sender.send(ProgressMessage::GenerationStart(generation));
    }

    fn on_generation_complete(&mut self, summary: &GenerationSummary) {
        let _ = self
            .sender
            .send(ProgressMessage::GenerationComplete(summary.clone()));
    }
}

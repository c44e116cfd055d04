//! Transcoder command options for a [`MuxPlan`].

use crate::config::{OutputSettings, TranscodeSettings};
use crate::tools::Invocation;

use super::plan_builder::{MuxPlan, MuxStrategy};

/// Builds transcoder arguments for a mux plan.
pub struct MuxOptionsBuilder<'a> {
    plan: &'a MuxPlan,
    output: &'a OutputSettings,
    transcode: &'a TranscodeSettings,
}

impl<'a> MuxOptionsBuilder<'a> {
    pub fn new(
        plan: &'a MuxPlan,
        output: &'a OutputSettings,
        transcode: &'a TranscodeSettings,
    ) -> Self {
        Self {
            plan,
            output,
            transcode,
        }
    }

    /// Append the plan's arguments to `invocation`.
    pub fn build(&self, invocation: Invocation) -> Invocation {
        let invocation = invocation.arg("-y");
        let invocation = match self.plan.strategy {
            MuxStrategy::AudioTranscode => self.add_transcode_options(invocation),
            MuxStrategy::StreamCopy | MuxStrategy::AudioRemux => {
                self.add_stream_copy_options(invocation)
            }
        };
        invocation
            .path_arg(&self.plan.output)
            .produces(&self.plan.output)
    }

    fn add_stream_copy_options(&self, mut invocation: Invocation) -> Invocation {
        let inputs = self.plan.inputs();
        for input in &inputs {
            invocation = invocation.arg("-i").path_arg(input);
        }
        for index in 0..inputs.len() {
            invocation = invocation.args(["-map".to_string(), index.to_string()]);
        }

        if let Some(fps) = self.plan.video_fps {
            invocation = invocation.arg("-r").arg(format_fps(fps));
        }
        if self.plan.video.is_some() {
            invocation = invocation.args(["-c:v", "copy"]);
        }
        invocation = invocation.args(["-c:a", "copy"]);
        if self.plan.captions.is_some() {
            invocation = invocation.args(["-c:s", self.output.subtitle_codec.as_str()]);
        }
        invocation
    }

    fn add_transcode_options(&self, mut invocation: Invocation) -> Invocation {
        if let Some(audio) = &self.plan.audio {
            invocation = invocation.arg("-i").path_arg(audio);
        }
        invocation
            .arg("-vn")
            .args(["-c:a", self.transcode.encoder.as_str()])
            .args(["-q:a", self.transcode.quality.as_str()])
    }
}

/// `30` for whole rates, `29.97` otherwise.
fn format_fps(fps: f64) -> String {
    if fps.fract() == 0.0 {
        format!("{}", fps as i64)
    } else {
        let rendered = format!("{:.3}", fps);
        rendered.trim_end_matches('0').to_string()
    }
}

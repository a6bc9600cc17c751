/// 语音合成条目（CSV 中的一行）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechItem {
    pub id: String,
    pub text: String,
}

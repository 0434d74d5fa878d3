/// BERT for Sequence Classification (such as flagging at-risk posts)
pub mod sequence_classification;

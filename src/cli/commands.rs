use clap::{Args, Subcommand};

use crate::infrastructure::QuestionFilter;
use crate::models::OptionLetter;
use crate::parser::SegmentStrategy;

/// 子命令
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 解析题目原文并整体替换题库
    Load(LoadArgs),

    /// 列出题库中的题目
    List(ListArgs),

    /// 开始一次限时答题
    Quiz,

    /// 查看某次答题的成绩与错题解析
    Results(ResultsArgs),
}

#[derive(Args, Debug)]
pub struct LoadArgs {
    /// 原文路径（页与页之间用换页符分隔），缺省使用配置中的 source_path
    #[arg(long)]
    pub source: Option<String>,

    /// 切分策略: auto / delimiter / marker
    #[arg(long)]
    pub strategy: Option<SegmentStrategy>,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// 按题干内容搜索（忽略大小写）
    #[arg(long)]
    pub search: Option<String>,

    /// 按正确答案过滤
    #[arg(long)]
    pub answer: Option<OptionLetter>,
}

impl From<ListArgs> for QuestionFilter {
    fn from(args: ListArgs) -> Self {
        QuestionFilter {
            search: args.search,
            correct_option: args.answer,
        }
    }
}

#[derive(Args, Debug)]
pub struct ResultsArgs {
    /// 会话编号
    pub session_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_parse_load_with_strategy() {
        let cli = Cli::try_parse_from(["quiz-simulator", "load", "--strategy", "marker"]).unwrap();
        match cli.command {
            Commands::Load(args) => {
                assert_eq!(args.strategy, Some(SegmentStrategy::Marker));
                assert!(args.source.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_list_args_become_filter() {
        let cli =
            Cli::try_parse_from(["quiz-simulator", "list", "--search", "risk", "--answer", "c"])
                .unwrap();
        let Commands::List(args) = cli.command else {
            panic!("expected list");
        };
        let filter = QuestionFilter::from(args);
        assert_eq!(filter.search.as_deref(), Some("risk"));
        assert_eq!(filter.correct_option, Some(OptionLetter::C));
    }

    #[test]
    fn test_unknown_strategy_is_rejected() {
        assert!(Cli::try_parse_from(["quiz-simulator", "load", "--strategy", "pages"]).is_err());
    }

    #[test]
    fn test_results_requires_session_id() {
        let cli = Cli::try_parse_from(["quiz-simulator", "results", "7"]).unwrap();
        assert!(matches!(cli.command, Commands::Results(ResultsArgs { session_id: 7 })));
    }
}

//! Property tests for chunking and retrieval ordering.

use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::sync::Arc;

use async_trait::async_trait;
use proptest::prelude::*;
use quizlab_rag::{EmbeddingProvider, Retriever, RetrieverConfig, chunk_text, word_count};

/// Deterministic hash-based embeddings whose direction depends on the content.
struct HashEmbedder {
    dimensions: usize,
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed(&self, text: &str) -> quizlab_rag::Result<Vec<f32>> {
        let hash = text.bytes().fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
        Ok((0..self.dimensions).map(|i| ((hash.wrapping_add(i as u64) % 1000) as f32).sin()).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

fn arb_words() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec("[a-z]{1,8}", 0..120)
}

/// Joins words with a mix of whitespace so chunking has something to normalise.
fn arb_text() -> impl Strategy<Value = (Vec<String>, String)> {
    arb_words().prop_flat_map(|words| {
        let n = words.len();
        (Just(words), proptest::collection::vec(prop_oneof![Just(" "), Just("\n"), Just("\t  ")], n))
    })
    .prop_map(|(words, separators)| {
        let text = words
            .iter()
            .zip(separators.iter())
            .map(|(w, s)| format!("{w}{s}"))
            .collect::<String>();
        (words, text)
    })
}

mod prop_chunking {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn chunk_counts_and_sizes((words, text) in arb_text(), size in 1usize..30) {
            let chunks = chunk_text(&text, NonZeroUsize::new(size).unwrap());

            prop_assert_eq!(chunks.len(), words.len().div_ceil(size));
            if let Some((last, full)) = chunks.split_last() {
                for chunk in full {
                    prop_assert_eq!(word_count(chunk), size);
                }
                let last_words = word_count(last);
                prop_assert!((1..=size).contains(&last_words));
            }
        }

        #[test]
        fn chunks_reconstruct_word_sequence((words, text) in arb_text(), size in 1usize..30) {
            let chunks = chunk_text(&text, NonZeroUsize::new(size).unwrap());
            prop_assert_eq!(chunks.join(" "), words.join(" "));
        }
    }
}

mod prop_retrieval {
    use super::*;

    const DIM: usize = 8;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn results_are_bounded_unique_ordered_and_repeatable(
            words in proptest::collection::vec("[a-z]{2,6}", 1..80),
            chunk_size in 1usize..10,
            query in "[a-z ]{0,20}",
            top_k in 1usize..15,
        ) {
            let text = words.join(" ");
            let config = RetrieverConfig::builder().chunk_size(chunk_size).build().unwrap();
            let retriever = Retriever::builder()
                .config(config)
                .embedding_provider(Arc::new(HashEmbedder { dimensions: DIM }))
                .build()
                .unwrap();
            let chunk_count = retriever.chunk(&text).len();

            let rt = tokio::runtime::Runtime::new().unwrap();
            let (first, second) = rt.block_on(async {
                let first = retriever.retrieve_scored(&text, &query, top_k).await.unwrap();
                let second = retriever.retrieve_scored(&text, &query, top_k).await.unwrap();
                (first, second)
            });

            prop_assert_eq!(first.len(), top_k.min(chunk_count));

            let unique: HashSet<usize> = first.iter().map(|r| r.index).collect();
            prop_assert_eq!(unique.len(), first.len());

            let chunks = retriever.chunk(&text);
            for result in &first {
                prop_assert_eq!(&chunks[result.index].text, &result.text);
            }

            for window in first.windows(2) {
                prop_assert!(
                    window[0].distance <= window[1].distance,
                    "results not in ascending order: {} > {}",
                    window[0].distance,
                    window[1].distance,
                );
                if window[0].distance == window[1].distance {
                    prop_assert!(window[0].index < window[1].index);
                }
            }

            prop_assert_eq!(first, second);
        }
    }
}

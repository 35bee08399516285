use std::pin::Pin;
use std::sync::Arc;

use crate::OpenAiAdapter;
use crate::api_v1::ChatCompletionRequest;
use futures_core::stream::Stream;
use guru_core::error::{GuruError, Result};
use guru_core::provider::{ChatCompleteParameters, StreamingChatProvider};

impl StreamingChatProvider for OpenAiAdapter {
    type Delta<'s>
        = Pin<Box<dyn Stream<Item = Result<String>> + Send + 's>>
    where
        Self: 's;

    fn chat_complete_stream<'s>(&'s self, params: ChatCompleteParameters) -> Self::Delta<'s> {
        let client = Arc::clone(&self.client);

        Box::pin(async_stream::try_stream! {
            use futures_util::StreamExt;

            let request = ChatCompletionRequest::try_from(&params)?;

            let stream = client.chat_completion_stream(request, params.credential());
            futures_util::pin_mut!(stream);

            while let Some(chunk) = stream.next().await {
                let chunk = chunk.map_err(GuruError::from)?;
                let mut finished = false;

                for choice in chunk.choices {
                    // Only the first choice is rendered.
                    if choice.index != 0 {
                        continue;
                    }

                    if let Some(text) = choice.delta.content.filter(|t| !t.is_empty()) {
                        yield text;
                    }

                    finished |= choice.finish_reason.is_some();
                }

                if finished {
                    return;
                }
            }
        })
    }
}

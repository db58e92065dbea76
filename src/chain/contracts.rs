//! Solidity interfaces of the contracts the bridger talks to.

use alloy::sol;

sol! {
    /// Uniswap V3 quoter (eth_call only).
    #[sol(rpc)]
    #[derive(Debug)]
    interface IQuoter {
        function quoteExactInputSingle(
            address tokenIn,
            address tokenOut,
            uint24 fee,
            uint256 amountIn,
            uint160 sqrtPriceLimitX96
        ) external returns (uint256 amountOut);
    }

    /// LayerZero OFT v1 fee estimation.
    #[sol(rpc)]
    #[derive(Debug)]
    interface IOFT {
        function estimateSendFee(
            uint16 _dstChainId,
            bytes calldata _toAddress,
            uint256 _amount,
            bool _useZro,
            bytes calldata _adapterParams
        ) external view returns (uint256 nativeFee, uint256 zroFee);
    }

    /// Swap on the source chain, then bridge the output through the OFT.
    #[sol(rpc)]
    #[derive(Debug)]
    interface ISwappableBridge {
        function poolFee() external view returns (uint24);

        function swapAndBridge(
            uint256 amountIn,
            uint256 amountOutMin,
            uint16 dstChainId,
            address to,
            address refundAddress,
            address zroPaymentAddress,
            bytes calldata adapterParams
        ) external payable;
    }
}
